/// Configuration for an import run.
///
/// ```text
/// ┌──────────────────┬──────────────────────────────────────────────────┐
/// │ Field            │ Purpose                                          │
/// ├──────────────────┼──────────────────────────────────────────────────┤
/// │ truncation       │ Whether a partial trailing record fails the run  │
/// │ skip_empty_names │ Drop zero-length names instead of applying ""    │
/// └──────────────────┴──────────────────────────────────────────────────┘
/// ```
///
/// The default reproduces the plain import behaviour: truncated tails are
/// ignored and every record, empty name or not, reaches the sink.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportConfig {
    pub truncation: TruncationPolicy,
    pub skip_empty_names: bool,
}

/// What to do when the source ends inside a record.
///
/// ```text
/// ┌────────┬──────────────────────────────────────────────────────────┐
/// │ Policy │ Behavior                                                 │
/// ├────────┼──────────────────────────────────────────────────────────┤
/// │ Silent │ Stop, return Ok. The cut shows up only in ImportResult.  │
/// │ Strict │ Stop, return ImportError::Truncated. Names already       │
/// │        │ applied stay applied.                                    │
/// └────────┴──────────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TruncationPolicy {
    #[default]
    Silent,
    Strict,
}
