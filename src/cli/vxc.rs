//! Cross-connect command handlers

use crate::cli::output::{format_vxc_json, format_vxc_table};
use crate::cli::VxcShowArgs;
use crate::provision::{read_vxc, ProvisionContext};

/// Handle `fabric vxc show`
///
/// Reads with no declaration, so the remote-assigned VLANs are shown.
pub async fn handle_vxc_show(
    ctx: &ProvisionContext,
    args: &VxcShowArgs,
) -> Result<String, Box<dyn std::error::Error>> {
    let vxc = read_vxc(ctx, &args.uid, None).await?;

    if args.json {
        Ok(format_vxc_json(&vxc)?)
    } else {
        Ok(format_vxc_table(&vxc))
    }
}
