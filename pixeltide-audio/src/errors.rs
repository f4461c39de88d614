/// Construction-time rejection for a [`crate::source::SampleSource`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("sample source must be non-empty")]
    Empty,
    #[error("sample duration {0:.2}s exceeds the {1:.2}s limit")]
    DurationExceeded(f32, f32),
    #[error("decoder reported {0} channels, sample sources require exactly 1")]
    NotMono(u8),
}
