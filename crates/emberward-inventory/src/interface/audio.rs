//! Audio collaborator contract.

/// Fire-and-forget sound playback. No return value is ever consumed.
pub trait AudioSink: Send + Sync {
    /// Plays a sound by id at the given volume and pitch.
    fn play_sound(&self, id: &str, volume: f32, pitch: f32);
}
