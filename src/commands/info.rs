//! `info`: what bloat-hunter knows about the machine it runs on.

use std::path::PathBuf;

use super::{CommandContext, print_report, report};
use crate::error::Result;
use crate::platform::{self, HostPlatform, WslInfo};

/// Platform details shown by `info`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct HostInfo {
    pub(crate) platform: HostPlatform,
    /// Distribution or release name when it can be read
    pub(crate) variant: Option<String>,
    pub(crate) home: Option<PathBuf>,
    pub(crate) wsl: Option<WslInfo>,
}

pub(crate) fn info(ctx: &CommandContext) -> Result<HostInfo> {
    let platform = ctx.guard.platform();
    let host = HostInfo {
        platform,
        variant: platform::os_variant(platform),
        home: ctx.guard.home().map(PathBuf::from),
        wsl: ctx.wsl.clone(),
    };

    print_report(|out| report::write_info(out, &host))?;
    Ok(host)
}
