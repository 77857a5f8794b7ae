//! Record stores built by the log parser.
//!
//! Each level owns the next: a [`StepStore`] owns tracks, a track owns its
//! surfaces, a surface owns its steps. Entries come into existence through the
//! `*_or_default` accessors on the parent the first time a line refers to them.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::keys::{Slot, StepKey, SurfaceKey, TrackKey};

fn entries<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    K: Serialize,
    V: Serialize,
    S: Serializer,
{
    serializer.collect_seq(map.iter())
}

/// Raw feature values captured for a single step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    features: BTreeMap<String, String>,
}

impl StepRecord {
    /// Stores a feature value, replacing any earlier value for the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.features.insert(name.into(), value.into());
    }

    /// Returns the raw value recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.features.get(name).map(String::as_str)
    }

    /// Iterates features in name order.
    pub fn features(&self) -> impl Iterator<Item = (&str, &str)> {
        self.features
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Steps recorded on one surface of one track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SurfaceSteps {
    #[serde(serialize_with = "entries")]
    steps: BTreeMap<Slot<StepKey>, StepRecord>,
}

impl SurfaceSteps {
    pub fn step_or_default(&mut self, step: Slot<StepKey>) -> &mut StepRecord {
        self.steps.entry(step).or_default()
    }

    pub fn step(&self, step: Slot<StepKey>) -> Option<&StepRecord> {
        self.steps.get(&step)
    }

    /// Steps in ascending numeric order.
    pub fn steps(&self) -> impl Iterator<Item = (Slot<StepKey>, &StepRecord)> {
        self.steps.iter().map(|(key, record)| (*key, record))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Surfaces recorded for one track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackSurfaces {
    #[serde(serialize_with = "entries")]
    surfaces: BTreeMap<Slot<SurfaceKey>, SurfaceSteps>,
}

impl TrackSurfaces {
    pub fn surface_or_default(&mut self, surface: Slot<SurfaceKey>) -> &mut SurfaceSteps {
        self.surfaces.entry(surface).or_default()
    }

    pub fn surface(&self, surface: Slot<SurfaceKey>) -> Option<&SurfaceSteps> {
        self.surfaces.get(&surface)
    }

    /// Surfaces in ascending numeric order.
    pub fn surfaces(&self) -> impl Iterator<Item = (Slot<SurfaceKey>, &SurfaceSteps)> {
        self.surfaces.iter().map(|(key, steps)| (*key, steps))
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

/// Step level store: track -> surface -> step -> feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StepStore {
    #[serde(serialize_with = "entries")]
    tracks: BTreeMap<Slot<TrackKey>, TrackSurfaces>,
}

impl StepStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_or_default(&mut self, track: Slot<TrackKey>) -> &mut TrackSurfaces {
        self.tracks.entry(track).or_default()
    }

    /// Returns the step record at the given position, creating every missing level.
    pub fn record_or_default(
        &mut self,
        track: Slot<TrackKey>,
        surface: Slot<SurfaceKey>,
        step: Slot<StepKey>,
    ) -> &mut StepRecord {
        self.track_or_default(track)
            .surface_or_default(surface)
            .step_or_default(step)
    }

    pub fn track(&self, track: Slot<TrackKey>) -> Option<&TrackSurfaces> {
        self.tracks.get(&track)
    }

    pub fn record(
        &self,
        track: Slot<TrackKey>,
        surface: Slot<SurfaceKey>,
        step: Slot<StepKey>,
    ) -> Option<&StepRecord> {
        self.track(track)?.surface(surface)?.step(step)
    }

    /// Tracks in ascending numeric order.
    pub fn tracks(&self) -> impl Iterator<Item = (Slot<TrackKey>, &TrackSurfaces)> {
        self.tracks.iter().map(|(key, surfaces)| (*key, surfaces))
    }

    /// Total number of step records across all tracks and surfaces.
    pub fn step_count(&self) -> usize {
        self.tracks
            .values()
            .flat_map(|track| track.surfaces.values())
            .map(SurfaceSteps::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Surface level values (smoothed estimate, covariance entries).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SurfaceAnnotation {
    values: BTreeMap<String, String>,
}

impl SurfaceAnnotation {
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Iterates annotations in name order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Annotation sets for the surfaces of one track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackAnnotations {
    #[serde(serialize_with = "entries")]
    surfaces: BTreeMap<Slot<SurfaceKey>, SurfaceAnnotation>,
}

impl TrackAnnotations {
    pub fn surface_or_default(&mut self, surface: Slot<SurfaceKey>) -> &mut SurfaceAnnotation {
        self.surfaces.entry(surface).or_default()
    }

    pub fn surface(&self, surface: Slot<SurfaceKey>) -> Option<&SurfaceAnnotation> {
        self.surfaces.get(&surface)
    }

    pub fn surfaces(&self) -> impl Iterator<Item = (Slot<SurfaceKey>, &SurfaceAnnotation)> {
        self.surfaces.iter().map(|(key, values)| (*key, values))
    }
}

/// Surface level (Kalman) store: track -> surface -> annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationStore {
    #[serde(serialize_with = "entries")]
    tracks: BTreeMap<Slot<TrackKey>, TrackAnnotations>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_or_default(&mut self, track: Slot<TrackKey>) -> &mut TrackAnnotations {
        self.tracks.entry(track).or_default()
    }

    pub fn annotation_or_default(
        &mut self,
        track: Slot<TrackKey>,
        surface: Slot<SurfaceKey>,
    ) -> &mut SurfaceAnnotation {
        self.track_or_default(track).surface_or_default(surface)
    }

    /// Looks up the annotation set of a surface without creating it.
    pub fn annotation(
        &self,
        track: Slot<TrackKey>,
        surface: Slot<SurfaceKey>,
    ) -> Option<&SurfaceAnnotation> {
        self.tracks.get(&track)?.surface(surface)
    }

    pub fn tracks(&self) -> impl Iterator<Item = (Slot<TrackKey>, &TrackAnnotations)> {
        self.tracks.iter().map(|(key, surfaces)| (*key, surfaces))
    }

    /// Number of surfaces carrying an annotation set.
    pub fn surface_count(&self) -> usize {
        self.tracks.values().map(|track| track.surfaces.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Both stores produced by a single parse pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogRecords {
    pub steps: StepStore,
    pub annotations: AnnotationStore,
}
