use futures::{pin_mut, Stream, StreamExt, TryStreamExt};
use itertools::Itertools;
use log::{debug, info};
use std::{io::Write, path::Path};

use crate::{
    allele::allele_keys,
    anyvar::{AlleleRegistrar, AnyVarClient, AnyVarError},
    vcf::{reference_genome, VariantReader, VariantRecord, VcfError},
};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Vcf(#[from] VcfError),
    #[error(transparent)]
    AnyVar(#[from] AnyVarError),
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub records: usize,
    pub alleles: usize,
}

/// Registers every alternate allele of `records` in order, writing each
/// normalized object to `out` as a JSON line.
///
/// At most `limit` records are pulled from the stream. The first error ends
/// the run; nothing after the failing allele is sent.
pub async fn load<S, R, W>(
    records: S,
    registrar: &R,
    limit: Option<usize>,
    out: &mut W,
) -> Result<LoadSummary, LoadError>
where
    S: Stream<Item = Result<VariantRecord, VcfError>>,
    R: AlleleRegistrar,
    W: Write,
{
    let records = records.take(limit.unwrap_or(usize::MAX));
    pin_mut!(records);

    let mut summary = LoadSummary::default();
    while let Some(record) = records.try_next().await? {
        summary.records += 1;
        debug!(
            "chrom: {} pos: {} ref: {} alts: [{}]",
            record.chrom,
            record.pos,
            record.reference,
            record.alternates.iter().join(", ")
        );

        let keys = allele_keys(&record);
        debug!("allele keys: {:?}", keys);
        for key in keys {
            let object = registrar.register_allele(&key).await?;
            serde_json::to_writer(&mut *out, &object).map_err(std::io::Error::from)?;
            writeln!(out)?;
            out.flush()?;
            summary.alleles += 1;
        }
    }
    Ok(summary)
}

/// Opens `vcf_path` and loads it into the AnyVar instance at `anyvar_url`,
/// printing normalized objects to stdout.
pub async fn load_vcf(
    vcf_path: &Path,
    anyvar_url: &str,
    limit: Option<usize>,
) -> Result<LoadSummary, LoadError> {
    let reader = VariantReader::open(vcf_path).await?;
    info!("reference genome: {}", reference_genome(reader.header()));

    let client = AnyVarClient::new(anyvar_url)?;
    info!("registering alleles at {}", client.endpoint());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = load(reader.records(), &client, limit, &mut out).await?;
    info!(
        "loaded {} alleles from {} records",
        summary.alleles, summary.records
    );
    Ok(summary)
}
