//! VCF 4.2 writer.
//!
//! Output is plain text, one line per record, columns separated by tabs:
//!
//! ```text
//! #CHROM  POS     ID   REF  ALT  QUAL  FILTER  INFO
//! chr1    100000  rs1  G    A    .     .       BETA=0.1;SE=0.05;Z=2.0;P=0.04550026389635842;LOGP=1.3419886831660084
//! ```
//!
//! Absent values are written as `.`.

use std::fmt::Write as _;
use std::io::Write;

use chrono::Local;

use crate::core::contig::ContigRegistry;
use crate::core::record::MISSING;
use crate::core::variant::Variant;

pub const FILE_FORMAT: &str = "VCFv4.2";
pub const SOURCE: &str = "sumstats-vcf";
pub const COLUMN_HEADER: &str = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO";

/// `##INFO` definitions, in output order
const INFO_DEFINITIONS: [(&str, &str); 5] = [
    ("BETA", "Effect Size of ALT Variant"),
    ("SE", "Standard Error of BETA"),
    ("Z", "Z-score of ALT Variant"),
    ("P", "P-value of ALT Variant"),
    ("LOGP", "-1*log10(P) of ALT Variant"),
];

/// Study-level values written to the `##` meta lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMeta {
    /// `YYYY-MM-DD`
    pub file_date: String,
    pub source: String,
    pub reference: String,
    pub doi: Option<String>,
    pub phenotype: Option<String>,
}

impl HeaderMeta {
    /// Header values dated today (local time)
    pub fn new(reference: impl Into<String>, doi: Option<String>, phenotype: Option<String>) -> Self {
        Self {
            file_date: Local::now().format("%Y-%m-%d").to_string(),
            source: SOURCE.to_string(),
            reference: reference.into(),
            doi,
            phenotype,
        }
    }
}

/// Writes a VCF header followed by records
pub struct VcfWriter<W: Write> {
    inner: W,
}

impl<W: Write> VcfWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write the meta lines, one `##contig` line per registry contig in load order,
    /// and the `#CHROM` row.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying writer.
    pub fn write_header(&mut self, meta: &HeaderMeta, contigs: &ContigRegistry) -> std::io::Result<()> {
        self.inner.write_all(format_header(meta, contigs).as_bytes())
    }

    /// Write one record line
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the underlying writer.
    pub fn write_record(&mut self, variant: &Variant) -> std::io::Result<()> {
        let mut line = format_record(variant);
        line.push('\n');
        self.inner.write_all(line.as_bytes())
    }

    /// Flush and return the underlying writer
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while flushing.
    pub fn finish(mut self) -> std::io::Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Render the complete header block, every line newline-terminated
pub fn format_header(meta: &HeaderMeta, contigs: &ContigRegistry) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "##fileformat={FILE_FORMAT}");
    let _ = writeln!(out, "##fileDate={}", meta.file_date);
    let _ = writeln!(out, "##source={}", meta.source);
    let _ = writeln!(out, "##reference={}", meta.reference);
    if let Some(doi) = &meta.doi {
        let _ = writeln!(out, "##doi={doi}");
    }
    if let Some(phenotype) = &meta.phenotype {
        let _ = writeln!(out, "##phenotype={phenotype}");
    }
    for contig in contigs.iter() {
        let _ = writeln!(
            out,
            "##contig=<ID={},length={},assembly={}>",
            contig.id, contig.length, contig.assembly
        );
    }
    for (id, description) in INFO_DEFINITIONS {
        let _ = writeln!(
            out,
            "##INFO=<ID={id},Number=1,Type=Float,Description=\"{description}\">"
        );
    }
    out.push_str("##FILTER=<ID=.,Description=\"Not Provided\">\n");
    out.push_str(COLUMN_HEADER);
    out.push('\n');
    out
}

/// Render one record line (without the trailing newline)
pub fn format_record(variant: &Variant) -> String {
    let info = variant
        .info_entries()
        .iter()
        .map(|(key, value)| match value {
            Some(v) => format!("{key}={}", format_float(*v)),
            None => format!("{key}={MISSING}"),
        })
        .collect::<Vec<_>>()
        .join(";");

    let position = variant.position.to_string();
    let fields = [
        variant.contig.id.as_str(),
        position.as_str(),
        or_missing(&variant.name),
        or_missing(&variant.reference_allele),
        or_missing(&variant.alternate_allele),
        or_missing(&variant.quality),
        or_missing(&variant.filter),
        info.as_str(),
    ];
    fields.join("\t")
}

fn or_missing(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(MISSING)
}

/// Shortest round-trip rendering of a float.
///
/// Integral values keep a trailing `.0`; decimal exponents below -4 or from 16 up
/// switch to scientific notation with a signed, at least two-digit exponent
/// (`6.334248366623996e-05`, `1e+16`). Non-finite values are `inf`, `-inf` and `nan`.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // `{:e}` gives the shortest round-trip digits, e.g. "6.334248366623996e-5"
    let sci = format!("{value:e}");
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if value != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.abs());
    }

    let plain = value.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{plain}.0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contig::Contig;
    use crate::core::stats::SummaryStats;
    use std::sync::Arc;

    fn meta() -> HeaderMeta {
        HeaderMeta {
            file_date: "2024-03-01".to_string(),
            source: SOURCE.to_string(),
            reference: "hg38".to_string(),
            doi: Some("10.1000/xyz".to_string()),
            phenotype: Some("height".to_string()),
        }
    }

    #[test]
    fn test_format_header() {
        let contigs =
            ContigRegistry::from_sizes([("chr1", 248_956_422), ("chr2", 242_193_529)], "hg38")
                .unwrap();
        let expected = "##fileformat=VCFv4.2
##fileDate=2024-03-01
##source=sumstats-vcf
##reference=hg38
##doi=10.1000/xyz
##phenotype=height
##contig=<ID=chr1,length=248956422,assembly=hg38>
##contig=<ID=chr2,length=242193529,assembly=hg38>
##INFO=<ID=BETA,Number=1,Type=Float,Description=\"Effect Size of ALT Variant\">
##INFO=<ID=SE,Number=1,Type=Float,Description=\"Standard Error of BETA\">
##INFO=<ID=Z,Number=1,Type=Float,Description=\"Z-score of ALT Variant\">
##INFO=<ID=P,Number=1,Type=Float,Description=\"P-value of ALT Variant\">
##INFO=<ID=LOGP,Number=1,Type=Float,Description=\"-1*log10(P) of ALT Variant\">
##FILTER=<ID=.,Description=\"Not Provided\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
";
        assert_eq!(format_header(&meta(), &contigs), expected);
    }

    #[test]
    fn test_header_date_is_iso() {
        let meta = HeaderMeta::new("hg19", None, None);
        assert_eq!(meta.file_date.len(), 10);
        assert_eq!(meta.file_date.as_bytes()[4], b'-');
        assert_eq!(meta.source, "sumstats-vcf");
    }

    #[test]
    fn test_format_record() {
        let variant = Variant {
            contig: Arc::new(Contig::new("chr1", 248_956_422, "hg38")),
            position: 100_000,
            name: Some("rs1".into()),
            reference_allele: Some("G".into()),
            alternate_allele: Some("A".into()),
            filter: None,
            quality: None,
            info: SummaryStats {
                beta: Some(0.1),
                stderr: Some(0.05),
                zscore: Some(2.0),
                pvalue: None,
                logp: Some(f64::INFINITY),
            },
        };
        assert_eq!(
            format_record(&variant),
            "chr1\t100000\trs1\tG\tA\t.\t.\tBETA=0.1;SE=0.05;Z=2.0;P=.;LOGP=inf"
        );
    }

    #[test]
    fn test_writer_header_then_records() {
        let contigs = ContigRegistry::from_sizes([("chr1", 10)], "hg38").unwrap();
        let variant = Variant {
            contig: Arc::clone(contigs.get("chr1").unwrap()),
            position: 5,
            name: None,
            reference_allele: None,
            alternate_allele: None,
            filter: Some("PASS".into()),
            quality: Some("50".into()),
            info: SummaryStats::default(),
        };

        let mut writer = VcfWriter::new(Vec::new());
        writer.write_header(&meta(), &contigs).unwrap();
        writer.write_record(&variant).unwrap();

        let text = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert!(text.ends_with(
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\nchr1\t5\t.\t.\t.\t50\tPASS\tBETA=.;SE=.;Z=.;P=.;LOGP=.\n"
        ));
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(-3.0), "-3.0");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(6.334248366623996e-05), "6.334248366623996e-05");
        assert_eq!(format_float(1e-300), "1e-300");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1234567890123456.0), "1234567890123456.0");
        assert_eq!(format_float(1.5e20), "1.5e+20");
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_float(f64::NAN), "nan");
    }
}
