use clap::Parser;
use std::{io::Write, path::PathBuf};

use crate::anyvar::DEFAULT_ANYVAR_URL;

/// Load VCF file into AnyVar REST API
#[derive(Debug, Parser)]
#[command(name = "vcf-loader", version, about)]
pub struct Cli {
    /// VCF file to load (.vcf, .vcf.gz or .vcf.bgz)
    #[arg(value_name = "VCF_FILE")]
    pub vcf_file: PathBuf,

    /// AnyVar instance to load into
    #[arg(long, value_name = "URL", default_value = DEFAULT_ANYVAR_URL)]
    pub anyvar_url: String,

    /// Limit number of records to load
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

/// Writes a fatal error for the user. Unlike logging, this can't be filtered out.
pub fn report_failure<E: std::fmt::Display, W: Write>(err: &E, out: &mut W) {
    let _ = writeln!(out, "error: {err}");
    let _ = out.flush();
}
