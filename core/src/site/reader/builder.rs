//! Site reader builder.

use std::{
    io::{self, Read as _},
    num::NonZeroUsize,
};

use flate2::bufread::MultiGzDecoder;

use noodles_bgzf as bgzf;

use crate::{input, Input};

use super::DynReader;

/// A builder of site readers, detecting the format and compression of the source.
#[derive(Debug)]
pub struct Builder {
    input: Option<Input>,
    threads: NonZeroUsize,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            input: None,
            threads: NonZeroUsize::try_from(4).unwrap(),
        }
    }
}

impl Builder {
    /// Builds a site reader by opening the input and sniffing its compression and format.
    pub fn build(self) -> io::Result<DynReader> {
        match self.input.as_ref().unwrap_or(&Input::Stdin).open()? {
            input::Reader::File(reader) => self.build_from_reader(reader),
            input::Reader::Stdin(reader) => self.build_from_reader(reader),
        }
    }

    fn build_from_reader<R>(self, mut reader: R) -> io::Result<DynReader>
    where
        R: 'static + io::BufRead,
    {
        let compression_method = CompressionMethod::detect(&mut reader)?;
        let format = Format::detect(&mut reader, compression_method)?;

        let reader: DynReader = match compression_method {
            Some(CompressionMethod::Bgzf) => {
                let bgzf_reader = bgzf::reader::Builder::default()
                    .set_worker_count(self.threads)
                    .build_from_reader(reader);

                match format {
                    Format::Bcf => super::bcf::Reader::new(bgzf_reader).map(Box::new)?,
                    Format::Vcf => super::vcf::Reader::new(bgzf_reader).map(Box::new)?,
                }
            }
            None => match format {
                Format::Bcf => super::bcf::Reader::new(reader).map(Box::new)?,
                Format::Vcf => super::vcf::Reader::new(reader).map(Box::new)?,
            },
        };

        Ok(reader)
    }

    /// Sets the input source.
    pub fn set_input(mut self, input: Input) -> Self {
        self.input = Some(input);
        self
    }

    /// Sets the number of decompression worker threads.
    pub fn set_threads(mut self, threads: NonZeroUsize) -> Self {
        self.threads = threads;
        self
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Format {
    Bcf,
    Vcf,
}

impl Format {
    fn detect<R>(reader: &mut R, compression_method: Option<CompressionMethod>) -> io::Result<Self>
    where
        R: io::BufRead,
    {
        const BCF_MAGIC_NUMBER: [u8; 3] = *b"BCF";

        let src = reader.fill_buf()?;

        if let Some(compression_method) = compression_method {
            if compression_method == CompressionMethod::Bgzf {
                let mut decoder = MultiGzDecoder::new(src);
                let mut buf = [0; BCF_MAGIC_NUMBER.len()];
                decoder.read_exact(&mut buf)?;

                if buf == BCF_MAGIC_NUMBER {
                    return Ok(Format::Bcf);
                }
            }
        } else if let Some(buf) = src.get(..BCF_MAGIC_NUMBER.len()) {
            if buf == BCF_MAGIC_NUMBER {
                return Ok(Format::Bcf);
            }
        }

        Ok(Format::Vcf)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CompressionMethod {
    Bgzf,
}

impl CompressionMethod {
    fn detect<R>(reader: &mut R) -> io::Result<Option<Self>>
    where
        R: io::BufRead,
    {
        const GZIP_MAGIC_NUMBER: [u8; 2] = [0x1f, 0x8b];

        let src = reader.fill_buf()?;

        if let Some(buf) = src.get(..GZIP_MAGIC_NUMBER.len()) {
            if buf == GZIP_MAGIC_NUMBER {
                return Ok(Some(CompressionMethod::Bgzf));
            }
        }

        Ok(None)
    }
}
