//! `blogrip rip` – mirror the media of one or more sites.

use anyhow::Result;
use blogrip_core::config::RipperConfig;
use blogrip_core::proxy::ProxyConfig;
use blogrip_core::scheduler::{self, RipRequest};
use blogrip_core::sites;
use std::path::PathBuf;

#[derive(Debug)]
pub struct RipArgs {
    pub directory: PathBuf,
    pub sites_file: Option<PathBuf>,
    pub dedup_file: Option<PathBuf>,
    pub proxy_file: Option<PathBuf>,
    pub sites: Vec<String>,
}

pub fn run_rip(cfg: &RipperConfig, args: RipArgs) -> Result<()> {
    let mut site_list = args.sites;
    if let Some(path) = &args.sites_file {
        site_list.extend(sites::read_sites_file(path)?);
    }
    if site_list.is_empty() {
        anyhow::bail!("no sites given (pass site names or --sites-file)");
    }
    let proxy = args
        .proxy_file
        .as_deref()
        .map(ProxyConfig::load)
        .transpose()?;

    let request = RipRequest {
        sites: site_list,
        output_root: args.directory,
        dedup_path: super::dedup_path(args.dedup_file)?,
        proxy,
    };
    let summary = scheduler::rip(cfg, &request)?;

    for pair in &summary.pairs {
        println!("{}", pair);
    }
    for site in &summary.skipped_sites {
        println!("{}: skipped", site);
    }
    let totals = summary.totals();
    println!(
        "{} downloaded ({} bytes), {} failed",
        totals.downloaded, totals.bytes, totals.failed
    );
    Ok(())
}
