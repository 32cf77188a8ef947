//! Structural security checks
//!
//! The properties that matter are enforced by the type system and checked
//! at compile time: the scheme type implements [`ThresholdScheme`], whose
//! operations each take at most one party's share, and the built-in
//! defaults respect the minimum threshold. [`audit`] adds the one runtime
//! check that depends on configuration.

use crate::curve::Secp256k1;
use crate::ports::SystemClock;
use crate::scheme::{ThresholdEcdsa, ThresholdScheme};
use crate::{Error, Result, SchemeParameters, DEFAULT_PARTIES, DEFAULT_THRESHOLD};
use serde::Serialize;
use tracing::{info, warn};

/// Smallest threshold the scheme accepts
pub const MIN_THRESHOLD: usize = 2;

const _: () = assert!(MIN_THRESHOLD >= 2);
const _: () = assert!(DEFAULT_THRESHOLD >= MIN_THRESHOLD);
const _: () = assert!(DEFAULT_THRESHOLD <= DEFAULT_PARTIES);

const _: fn() = || {
    fn implements_scheme<T: ThresholdScheme>() {}
    implements_scheme::<ThresholdEcdsa<Secp256k1, SystemClock>>();
};

/// Outcome of a startup audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub threshold: usize,
    pub total_parties: usize,
    /// `threshold >= MIN_THRESHOLD`
    pub threshold_enforced: bool,
    /// Always false: [`ThresholdScheme`] has no operation over several shares
    pub reconstruction_exposed: bool,
}

/// Check configured parameters before any key material is created.
pub fn audit(params: &SchemeParameters) -> Result<AuditReport> {
    let threshold_enforced = params.threshold >= MIN_THRESHOLD;
    if !threshold_enforced {
        warn!(threshold = params.threshold, "Threshold below minimum");
        return Err(Error::InvalidConfig(format!(
            "Threshold must be at least {}",
            MIN_THRESHOLD
        )));
    }
    params.validate()?;

    let report = AuditReport {
        threshold: params.threshold,
        total_parties: params.total_parties,
        threshold_enforced,
        reconstruction_exposed: false,
    };
    info!(?report, "Security audit passed");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_passes() {
        let report = audit(&SchemeParameters::new(3, 5).unwrap()).unwrap();
        assert!(report.threshold_enforced);
        assert!(!report.reconstruction_exposed);
        assert_eq!((report.threshold, report.total_parties), (3, 5));
    }

    #[test]
    fn test_audit_rejects_deserialized_threshold_one() {
        let params: SchemeParameters =
            serde_json::from_str(r#"{"threshold":1,"total_parties":3}"#).unwrap();
        assert!(matches!(audit(&params), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_audit_rejects_threshold_above_parties() {
        let params = SchemeParameters {
            threshold: 4,
            total_parties: 3,
        };
        assert!(audit(&params).is_err());
    }
}
