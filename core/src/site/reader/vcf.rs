//! VCF site reader.

use std::io;

use noodles_vcf as vcf;
use vcf::record::{
    info::field::{key, Value},
    reference_bases::Base,
    Chromosome, Record as VcfRecord,
};

use crate::site::Site;

use super::ReadStatus;

/// A site reader for VCF sources.
pub struct Reader<R> {
    inner: vcf::Reader<R>,
    header: vcf::Header,
    buf: VcfRecord,
}

impl<R> Reader<R>
where
    R: io::BufRead,
{
    /// Creates a VCF site reader, consuming the source header.
    pub fn new(inner: R) -> io::Result<Self> {
        let mut inner = vcf::Reader::new(inner);

        let header = inner.read_header()?;

        Ok(Self {
            inner,
            header,
            buf: VcfRecord::default(),
        })
    }
}

impl<R> super::Reader for Reader<R>
where
    R: io::BufRead,
{
    fn contigs(&self) -> Vec<String> {
        contig_names(&self.header)
    }

    fn current_contig(&self) -> &str {
        match self.buf.chromosome() {
            Chromosome::Name(s) | Chromosome::Symbol(s) => s,
        }
    }

    fn read_site(&mut self) -> ReadStatus<Site> {
        match self.inner.read_record(&self.header, &mut self.buf) {
            Ok(0) => ReadStatus::Done,
            Ok(_) => ReadStatus::Read(site_from_record(&self.buf)),
            Err(e) => ReadStatus::Error(e),
        }
    }
}

pub(super) fn contig_names(header: &vcf::Header) -> Vec<String> {
    header
        .contigs()
        .keys()
        .map(|name| name.to_string())
        .collect()
}

/// Extracts the fields relevant for classification from a record.
///
/// Only a single-base `N` reference counts as unresolved, and only an integer `DP` value counts
/// as a reported depth; any other shape of the field is treated as absent.
pub(super) fn site_from_record(record: &VcfRecord) -> Site {
    let position = usize::from(record.position()) as u64;

    let reference_is_n = matches!(record.reference_bases()[..], [Base::N]);

    let depth = match record.info().get(&key::TOTAL_DEPTH) {
        Some(Some(Value::Integer(depth))) => u64::try_from(*depth).ok(),
        _ => None,
    };

    Site::new(position, reference_is_n, depth)
}

#[cfg(test)]
mod tests {
    use super::{super::Reader as _, *};

    fn src() -> String {
        [
            "##fileformat=VCFv4.3",
            "##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Combined depth across samples\">",
            "##contig=<ID=chr1,length=1000>",
            "##contig=<ID=chr2,length=500>",
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO",
            "chr1\t1\t.\tA\t.\t.\tPASS\tDP=450",
            "chr1\t2\t.\tN\t.\t.\tPASS\tDP=450",
            "chr1\t3\t.\tC\t.\t.\tPASS\t.",
        ]
        .join("\n")
            + "\n"
    }

    #[test]
    fn test_contigs_in_declaration_order() -> io::Result<()> {
        let src = src();
        let reader = Reader::new(src.as_bytes())?;

        assert_eq!(reader.contigs(), ["chr1", "chr2"]);

        Ok(())
    }

    #[test]
    fn test_read_sites() -> io::Result<()> {
        let src = src();
        let mut reader = Reader::new(src.as_bytes())?;

        let mut sites = Vec::new();

        loop {
            match reader.read_site() {
                ReadStatus::Read(site) => {
                    sites.push((reader.current_contig().to_string(), site))
                }
                ReadStatus::Error(e) => return Err(e),
                ReadStatus::Done => break,
            }
        }

        assert_eq!(
            sites,
            [
                (String::from("chr1"), Site::new(1, false, Some(450))),
                (String::from("chr1"), Site::new(2, true, Some(450))),
                (String::from("chr1"), Site::new(3, false, None)),
            ]
        );

        Ok(())
    }
}
