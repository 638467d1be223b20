use clap::Parser;
use std::process::ExitCode;

use vcf_loader::{
    cli::{report_failure, Cli},
    loader,
};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();

    match loader::load_vcf(&args.vcf_file, &args.anyvar_url, args.limit).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("{:?}", err);
            report_failure(&err, &mut std::io::stderr());
            ExitCode::FAILURE
        }
    }
}
