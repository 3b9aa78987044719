//! BCF site reader.

use std::io;

use noodles_bcf as bcf;
use noodles_vcf as vcf;

use crate::site::Site;

use super::{
    vcf::{contig_names, site_from_record},
    ReadStatus,
};

/// A site reader for BCF sources.
pub struct Reader<R> {
    inner: bcf::Reader<R>,
    header: vcf::Header,
    string_maps: bcf::header::StringMaps,
    buf: bcf::lazy::Record,
    contig: String,
}

impl<R> Reader<R>
where
    R: io::Read,
{
    /// Creates a BCF site reader, consuming the source header.
    pub fn new(inner: R) -> io::Result<Self> {
        let mut inner = bcf::Reader::from(inner);

        let header = inner.read_header()?;
        let string_maps = bcf::header::StringMaps::try_from(&header)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        Ok(Self {
            inner,
            header,
            string_maps,
            buf: bcf::lazy::Record::default(),
            contig: String::new(),
        })
    }
}

impl<R> super::Reader for Reader<R>
where
    R: io::Read,
{
    fn contigs(&self) -> Vec<String> {
        contig_names(&self.header)
    }

    fn current_contig(&self) -> &str {
        &self.contig
    }

    fn read_site(&mut self) -> ReadStatus<Site> {
        match self.inner.read_lazy_record(&mut self.buf) {
            Ok(0) => ReadStatus::Done,
            Ok(_) => match self.buf.try_into_vcf_record(&self.header, &self.string_maps) {
                Ok(record) => {
                    self.contig = record.chromosome().to_string();

                    ReadStatus::Read(site_from_record(&record))
                }
                Err(e) => ReadStatus::Error(e),
            },
            Err(e) => ReadStatus::Error(e),
        }
    }
}
