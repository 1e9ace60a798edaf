//! Canonical B-end rederivation.
//!
//! The remote may fulfil a cloud connection from an equivalent product that
//! is not itself orderable. On read, the reported B-end is mapped back to the
//! currently orderable product with the same identity, so the declared
//! configuration does not drift between reads.

use super::error::ProvisionError;
use crate::catalog::PartnerPort;
use crate::resolve::{resolve_partner_port, PartnerPortQuery};

/// Rederive the orderable product equivalent to `remote_uid`.
///
/// Fails with `InvalidPartnerBEnd` when `remote_uid` is not in the catalog at
/// all; adjudication errors from the re-run resolver pass through unchanged.
pub fn rederive_b_end<'c>(
    catalog: &'c [PartnerPort],
    remote_uid: &str,
) -> Result<&'c PartnerPort, ProvisionError> {
    let reported = catalog
        .iter()
        .find(|p| p.product_uid == remote_uid)
        .ok_or_else(|| ProvisionError::InvalidPartnerBEnd {
            product_uid: remote_uid.to_string(),
        })?;

    let canonical = resolve_partner_port(catalog, &PartnerPortQuery::describing(reported))?;
    if canonical.product_uid != remote_uid {
        tracing::debug!(
            remote_uid,
            canonical_uid = %canonical.product_uid,
            "B-end rederived to orderable equivalent"
        );
    }
    Ok(canonical)
}
