use futures::stream::{self, Stream};
use noodles_bgzf::r#async::Reader as BgzfReader;
use noodles_vcf::{self as vcf, header::record::value::Collection, r#async::io::Reader as VcfReader};
use std::{
    fmt, io,
    path::{Path, PathBuf},
};
use tokio::{
    fs::File as TkFile,
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
};

const MISSING: &str = ".";
const ALT_DELIMITER: char = ',';
const REFERENCE_KEY: &str = "reference";
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, thiserror::Error)]
pub enum VcfError {
    #[error("BCF input is not supported, convert it to VCF first (e.g. `bcftools view`): {}", .0.display())]
    UnsupportedBcf(PathBuf),
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read VCF record: {0}")]
    Read(#[from] io::Error),
    #[error("record on {chrom} has no position")]
    MissingPosition { chrom: String },
}

/// The fields of a VCF data line needed to describe its alleles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    pub chrom: String,
    /// 1-based, as written in the POS column.
    pub pos: usize,
    pub reference: String,
    pub alternates: Vec<String>,
}

impl TryFrom<&vcf::Record> for VariantRecord {
    type Error = VcfError;

    fn try_from(record: &vcf::Record) -> Result<Self, Self::Error> {
        let chrom = record.reference_sequence_name().to_string();
        let pos = match record.variant_start() {
            Some(result) => result?.get(),
            None => return Err(VcfError::MissingPosition { chrom }),
        };

        let alternates = match record.alternate_bases().as_ref() {
            "" | MISSING => Vec::new(),
            alts => alts.split(ALT_DELIMITER).map(String::from).collect(),
        };

        Ok(Self {
            chrom,
            pos,
            reference: record.reference_bases().to_string(),
            alternates,
        })
    }
}

/// Reference assembly a VCF declares in its `##reference` header lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceGenome {
    GRCh37,
    GRCh38,
}

impl fmt::Display for ReferenceGenome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceGenome::GRCh37 => f.write_str("GRCh37"),
            ReferenceGenome::GRCh38 => f.write_str("GRCh38"),
        }
    }
}

/// Anything that doesn't mention GRCh38 is assumed to be GRCh37.
pub fn reference_genome(header: &vcf::Header) -> ReferenceGenome {
    let is_grch38 = header
        .other_records()
        .iter()
        .filter(|(key, _)| key.as_ref() == REFERENCE_KEY)
        .any(|(_, collection)| match collection {
            Collection::Unstructured(values) => values.iter().any(|v| v.contains("GRCh38")),
            Collection::Structured(_) => false,
        });

    if is_grch38 {
        ReferenceGenome::GRCh38
    } else {
        ReferenceGenome::GRCh37
    }
}

type DynReader = VcfReader<Box<dyn AsyncBufRead + Unpin + Send>>;

/// Picks plain text or BGZF from the leading bytes, not the file name.
async fn get_reader(vcf_path: &Path) -> Result<DynReader, VcfError> {
    let ext = vcf_path.extension().and_then(|ext| ext.to_str());
    if ext.is_some_and(|ext| ext.eq_ignore_ascii_case("bcf")) {
        return Err(VcfError::UnsupportedBcf(vcf_path.to_path_buf()));
    }

    let mut file = BufReader::new(open_file(vcf_path).await?);
    let is_gzip = file
        .fill_buf()
        .await
        .map_err(|source| VcfError::Io {
            path: vcf_path.to_path_buf(),
            source,
        })?
        .starts_with(&GZIP_MAGIC);

    let inner: Box<dyn AsyncBufRead + Unpin + Send> = if is_gzip {
        Box::new(BgzfReader::new(file))
    } else {
        Box::new(file)
    };
    Ok(VcfReader::new(inner))
}

async fn open_file(path: &Path) -> Result<TkFile, VcfError> {
    TkFile::open(path).await.map_err(|source| VcfError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Forward-only reader over the data lines of a VCF.
pub struct VariantReader {
    inner: DynReader,
    header: vcf::Header,
    buf: vcf::Record,
}

impl VariantReader {
    /// Opens `path` and reads its header. BGZF compression is detected from the content.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, VcfError> {
        let path = path.as_ref();
        let mut inner = get_reader(path).await?;
        let header = inner.read_header().await.map_err(|source| VcfError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            inner,
            header,
            buf: vcf::Record::default(),
        })
    }

    pub fn header(&self) -> &vcf::Header {
        &self.header
    }

    /// Returns `Ok(None)` once the input is exhausted.
    pub async fn next_record(&mut self) -> Result<Option<VariantRecord>, VcfError> {
        if self.inner.read_record(&mut self.buf).await? == 0 {
            return Ok(None);
        }
        VariantRecord::try_from(&self.buf).map(Some)
    }

    /// Lazy stream of records in file order. Nothing is read until it is polled.
    pub fn records(self) -> impl Stream<Item = Result<VariantRecord, VcfError>> {
        stream::try_unfold(self, |mut reader| async move {
            let next = reader.next_record().await?;
            Ok::<_, VcfError>(next.map(|record| (record, reader)))
        })
    }
}
