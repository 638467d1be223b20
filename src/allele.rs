use crate::vcf::VariantRecord;

const KEY_DELIMITER: char = '-';

/// Derives one `chrom-pos-ref-alt` key per alternate allele, preserving allele order.
///
/// This is the gnomAD-style variant ID that AnyVar accepts as an allele definition.
/// A record with no alternates yields no keys.
pub fn allele_keys(record: &VariantRecord) -> Vec<String> {
    record
        .alternates
        .iter()
        .map(|alt| {
            format!(
                "{chrom}{d}{pos}{d}{reference}{d}{alt}",
                chrom = record.chrom,
                pos = record.pos,
                reference = record.reference,
                d = KEY_DELIMITER,
            )
        })
        .collect()
}
