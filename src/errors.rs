use thiserror::Error;

/// Failures raised while turning one consensus breakpoint cluster into a
/// variant call. Every variant is scoped to a single cluster; callers
/// processing a batch are expected to report the failure and keep going
/// with sibling clusters. Nothing here is retried.
#[derive(Error, Debug)]
pub enum SvDiscoveryError {
    /// Breakpoint validation failure: the left breakpoint sits to the right
    /// of the right breakpoint. Carries the full adjacency description so
    /// the offending evidence can be reviewed manually.
    #[error("left breakpoint positioned to the right of right breakpoint: {adjacency}")]
    BreakpointsOutOfOrder { adjacency: String },

    /// An insertion-shaped breakpoint (zero reference span) with no inserted
    /// sequence to back it up.
    #[error("suspected insertion but no inserted sequence could be inferred: {adjacency}")]
    InsertionWithoutSequence { adjacency: String },

    /// A deletion-shaped breakpoint (positive reference span) carrying both
    /// a duplication annotation and inserted sequence, which is unsupported.
    #[error(
        "suspected deletion but both inserted sequence and duplication exist (unsupported): {adjacency}"
    )]
    DeletionWithDuplicationAndInsertion { adjacency: String },

    /// Chimeric evidence whose two regions map to different reference
    /// contigs. Translocations are not called; the evidence is rejected
    /// rather than miscalled.
    #[error("chimeric alignment spans reference contigs {left} and {right}; translocations are unsupported")]
    CrossContigEvidence { left: String, right: String },

    /// A classified type outside the known enumeration. Indicates a logic
    /// defect, not a data problem.
    #[error("inferred SV type is not known: {name}")]
    UnknownSvType { name: String },

    /// Reference-sequence access failure, propagated unchanged.
    #[error("reference sequence access failed: {0}")]
    Io(#[from] std::io::Error),
}
