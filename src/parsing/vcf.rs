//! Reader for the VCF files this crate writes.
//!
//! Only the minimal shape is understood: the `##contig`, `##reference`, `##doi` and
//! `##phenotype` meta lines, the `#CHROM` header row, and eight-column records whose
//! INFO carries `BETA`, `SE`, `Z`, `P` and `LOGP`. Other meta lines and INFO keys
//! are skipped.
//!
//! Contig lines look like `##contig=<ID=chr1,length=248956422,assembly=hg38>`.

use std::io::BufRead;

use crate::core::contig::{Contig, ContigRegistry};
use crate::core::record::MISSING;
use crate::core::stats::SummaryStats;
use crate::core::variant::Variant;
use crate::error::{Error, Result};
use crate::parsing::ParseError;
use crate::utils::validation::check_contig_limit;

/// Assembly label used when neither the contig line nor `##reference` names one
pub const UNKNOWN_ASSEMBLY: &str = "UNKNOWN";

/// Study-level values and contigs recovered from a VCF header
#[derive(Debug, Clone)]
pub struct VcfHeader {
    pub contigs: ContigRegistry,
    pub reference: Option<String>,
    pub doi: Option<String>,
    pub phenotype: Option<String>,
    /// Physical lines read, through the `#CHROM` row
    pub lines_consumed: usize,
}

/// Read meta lines up to and including `#CHROM`, leaving `reader` at the first record.
///
/// # Errors
///
/// Returns `Error::Parse` for malformed contig lines, a missing `#CHROM` row, or no
/// contig lines at all, and `Error::DuplicateContig` for repeated contig ids.
pub fn read_header<R: BufRead>(reader: &mut R) -> Result<VcfHeader> {
    let mut contigs = Vec::new();
    let mut reference = None;
    let mut doi = None;
    let mut phenotype = None;
    let mut lines_consumed = 0;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line).map_err(ParseError::Io)? == 0 {
            return Err(ParseError::InvalidFormat("VCF header has no #CHROM line".to_string()).into());
        }
        lines_consumed += 1;
        let text = line.trim_end_matches(['\n', '\r']);

        if text.starts_with("#CHROM") {
            break;
        }
        if text.starts_with("##contig=") {
            if let Some(contig) = parse_contig_line(text)? {
                if check_contig_limit(contigs.len()).is_some() {
                    return Err(ParseError::TooManyContigs(contigs.len()).into());
                }
                contigs.push(contig);
            }
        } else if let Some(value) = text.strip_prefix("##reference=") {
            reference = Some(value.to_string());
        } else if let Some(value) = text.strip_prefix("##doi=") {
            doi = Some(value.to_string());
        } else if let Some(value) = text.strip_prefix("##phenotype=") {
            phenotype = Some(value.to_string());
        } else if !text.starts_with("##") && !text.is_empty() {
            return Err(ParseError::InvalidFormat(format!(
                "Unexpected line {lines_consumed} in VCF header: {text}"
            ))
            .into());
        }
    }

    if contigs.is_empty() {
        return Err(
            ParseError::InvalidFormat("No ##contig lines found in VCF header".to_string()).into(),
        );
    }

    let assembly = reference.as_deref().unwrap_or(UNKNOWN_ASSEMBLY);
    let contigs = contigs
        .into_iter()
        .map(|(id, length, contig_assembly)| {
            Contig::new(id, length, contig_assembly.unwrap_or_else(|| assembly.to_string()))
        })
        .collect();

    Ok(VcfHeader {
        contigs: ContigRegistry::from_contigs(contigs, assembly)?,
        reference,
        doi,
        phenotype,
        lines_consumed,
    })
}

/// Parse a single ##contig=<...> line into (id, length, assembly)
fn parse_contig_line(line: &str) -> Result<Option<(String, u64, Option<String>)>, ParseError> {
    let content = line
        .strip_prefix("##contig=<")
        .and_then(|s| s.strip_suffix('>'))
        .ok_or_else(|| ParseError::InvalidFormat(format!("Invalid contig line format: {line}")))?;

    let mut name: Option<String> = None;
    let mut length: Option<u64> = None;
    let mut assembly: Option<String> = None;

    for part in split_contig_fields(content) {
        if let Some((key, value)) = part.split_once('=') {
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key.to_lowercase().as_str() {
                "id" => name = Some(value.to_string()),
                "length" => length = value.parse().ok(),
                "assembly" => assembly = Some(value.to_string()),
                _ => {}
            }
        }
    }

    match (name, length) {
        (Some(name), Some(length)) => Ok(Some((name, length, assembly))),
        (Some(name), None) => Err(ParseError::InvalidFormat(format!(
            "Contig '{name}' missing length"
        ))),
        _ => Ok(None),
    }
}

/// Split contig fields, handling commas inside quoted values.
fn split_contig_fields(content: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (i, c) in content.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(&content[start..i]);
                // Safe: comma is 1 byte, so i + 1 is a valid char boundary
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(&content[start..]);

    fields
}

/// Parse one record line against the contigs of its header.
///
/// # Errors
///
/// `Error::MalformedRecord` for fewer than eight columns, a bad position, or an
/// unparseable INFO statistic; `Error::UnknownContig` for a CHROM not in `contigs`.
pub fn parse_record(line: &str, contigs: &ContigRegistry, line_num: usize) -> Result<Variant> {
    let fields: Vec<&str> = line.trim_end_matches(['\n', '\r']).split('\t').collect();
    if fields.len() < 8 {
        return Err(Error::malformed(
            line_num,
            "record",
            line.trim_end(),
            format!("has {} columns, expected 8", fields.len()),
        ));
    }

    let contig = contigs
        .get(fields[0])
        .cloned()
        .ok_or_else(|| Error::UnknownContig {
            line: line_num,
            chrom: fields[0].to_string(),
        })?;

    let position = match fields[1].parse::<u64>() {
        Ok(pos) if pos > 0 => pos,
        _ => return Err(Error::malformed(line_num, "POS", fields[1], "is not a 1-based position")),
    };

    Ok(Variant {
        contig,
        position,
        name: optional(fields[2]),
        reference_allele: optional(fields[3]),
        alternate_allele: optional(fields[4]),
        quality: optional(fields[5]),
        filter: optional(fields[6]),
        info: parse_info(fields[7], line_num)?,
    })
}

fn optional(value: &str) -> Option<String> {
    (value != MISSING && !value.is_empty()).then(|| value.to_string())
}

fn parse_info(info: &str, line_num: usize) -> Result<SummaryStats> {
    let mut stats = SummaryStats::default();
    if info == MISSING {
        return Ok(stats);
    }

    for entry in info.split(';') {
        let Some((key, value)) = entry.split_once('=') else {
            continue;
        };
        let (slot, field) = match key {
            "BETA" => (&mut stats.beta, "BETA"),
            "SE" => (&mut stats.stderr, "SE"),
            "Z" => (&mut stats.zscore, "Z"),
            "P" => (&mut stats.pvalue, "P"),
            "LOGP" => (&mut stats.logp, "LOGP"),
            _ => continue,
        };
        *slot = if value == MISSING {
            None
        } else {
            Some(
                value
                    .parse::<f64>()
                    .map_err(|e| Error::malformed(line_num, field, value, e.to_string()))?,
            )
        };
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "##fileformat=VCFv4.2
##fileDate=2024-01-01
##source=sumstats-vcf
##reference=hg19
##doi=10.1000/xyz
##phenotype=height
##contig=<ID=chr1,length=249250621,assembly=hg19>
##contig=<ID=chr2,length=243199373>
##INFO=<ID=BETA,Number=1,Type=Float,Description=\"Effect Size of ALT Variant\">
##FILTER=<ID=.,Description=\"Not Provided\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
";

    #[test]
    fn test_read_header() {
        let text = format!("{HEADER}chr1\t100\trs1\tG\tA\t.\t.\tBETA=0.1\n");
        let mut reader = Cursor::new(text);
        let header = read_header(&mut reader).unwrap();

        assert_eq!(header.contigs.len(), 2);
        assert_eq!(header.contigs.assembly(), "hg19");
        assert_eq!(header.contigs.get("chr2").unwrap().assembly, "hg19");
        assert_eq!(header.contigs.get("chr1").unwrap().length, 249_250_621);
        assert_eq!(header.reference.as_deref(), Some("hg19"));
        assert_eq!(header.doi.as_deref(), Some("10.1000/xyz"));
        assert_eq!(header.phenotype.as_deref(), Some("height"));
        assert_eq!(header.lines_consumed, 11);

        let mut rest = String::new();
        reader.read_line(&mut rest).unwrap();
        assert!(rest.starts_with("chr1\t100"));
    }

    #[test]
    fn test_read_header_without_contigs() {
        let mut reader = Cursor::new("##fileformat=VCFv4.2\n#CHROM\tPOS\tID\n");
        assert!(read_header(&mut reader).is_err());
    }

    #[test]
    fn test_read_header_without_chrom_row() {
        let mut reader = Cursor::new("##contig=<ID=chr1,length=10>\n");
        assert!(read_header(&mut reader).is_err());
    }

    #[test]
    fn test_parse_record() {
        let header = read_header(&mut Cursor::new(HEADER)).unwrap();
        let variant = parse_record(
            "chr1\t100\trs1\tG\tA\t.\tPASS\tBETA=0.1;SE=0.05;Z=2.0;P=.;LOGP=inf;AF=0.3\n",
            &header.contigs,
            12,
        )
        .unwrap();

        assert_eq!(variant.contig.id, "chr1");
        assert_eq!(variant.position, 100);
        assert_eq!(variant.name.as_deref(), Some("rs1"));
        assert_eq!(variant.reference_allele.as_deref(), Some("G"));
        assert_eq!(variant.alternate_allele.as_deref(), Some("A"));
        assert_eq!(variant.quality, None);
        assert_eq!(variant.filter.as_deref(), Some("PASS"));
        assert_eq!(variant.info.beta, Some(0.1));
        assert_eq!(variant.info.zscore, Some(2.0));
        assert_eq!(variant.info.pvalue, None);
        assert_eq!(variant.info.logp, Some(f64::INFINITY));
    }

    #[test]
    fn test_parse_record_errors() {
        let header = read_header(&mut Cursor::new(HEADER)).unwrap();
        assert!(matches!(
            parse_record("chr3\t1\t.\tA\tG\t.\t.\t.", &header.contigs, 12),
            Err(Error::UnknownContig { line: 12, .. })
        ));
        assert!(matches!(
            parse_record("chr1\t1\t.\tA\tG\t.\t.", &header.contigs, 13),
            Err(Error::MalformedRecord { line: 13, .. })
        ));
        assert!(matches!(
            parse_record("chr1\t0\t.\tA\tG\t.\t.\t.", &header.contigs, 14),
            Err(Error::MalformedRecord { field: "POS", .. })
        ));
        assert!(matches!(
            parse_record("chr1\t5\t.\tA\tG\t.\t.\tP=high", &header.contigs, 15),
            Err(Error::MalformedRecord { field: "P", .. })
        ));
    }

    #[test]
    fn test_parse_contig_line() {
        let contig = parse_contig_line("##contig=<ID=chr1,length=248956422,assembly=\"GRCh38.p14\">")
            .unwrap()
            .unwrap();
        assert_eq!(contig, ("chr1".to_string(), 248_956_422, Some("GRCh38.p14".to_string())));
        assert!(parse_contig_line("##contig=<ID=chr1>").is_err());
        assert!(parse_contig_line("##contig=<length=5>").unwrap().is_none());
    }

    #[test]
    fn test_split_contig_fields() {
        let fields = split_contig_fields(r#"ID=chr1,length=123,desc="foo,bar""#);
        assert_eq!(fields, vec!["ID=chr1", "length=123", r#"desc="foo,bar""#]);
    }
}
