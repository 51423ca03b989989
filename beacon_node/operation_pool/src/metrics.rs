pub use metrics::*;
use std::sync::LazyLock;

pub static ATTESTER_SLASHINGS_PENDING: LazyLock<Result<IntGauge>> = LazyLock::new(|| {
    try_create_int_gauge(
        "op_pool_attester_slashings_pending",
        "Number of validators with an attester slashing awaiting block inclusion",
    )
});
pub static ATTESTER_SLASHINGS_INCLUDED: LazyLock<Result<IntGauge>> = LazyLock::new(|| {
    try_create_int_gauge(
        "op_pool_attester_slashings_included",
        "Number of validators whose attester slashing has been included on chain",
    )
});
pub static ATTESTER_SLASHING_CANDIDATES: LazyLock<Result<IntCounterVec>> = LazyLock::new(|| {
    try_create_int_counter_vec(
        "op_pool_attester_slashing_candidates_total",
        "Count of slashable validator indices offered to the pool, by outcome",
        &["outcome"],
    )
});
pub static ATTESTER_SLASHINGS_PRUNED: LazyLock<Result<IntCounter>> = LazyLock::new(|| {
    try_create_int_counter(
        "op_pool_attester_slashings_pruned_total",
        "Count of pending attester slashings dropped because the validator became unslashable",
    )
});
pub static ATTESTER_SLASHING_INSERT_TIME: LazyLock<Result<Histogram>> = LazyLock::new(|| {
    try_create_histogram(
        "op_pool_attester_slashing_insert_seconds",
        "Time to insert an attester slashing into the pool",
    )
});
