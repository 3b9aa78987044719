//! Repeat-region masks.
//!
//! A [`Mask`] is the set of genomic positions covered by the region intervals of a single
//! chromosome, read from a BED-style region list of tab-separated `chromosome`, `start`, `end`
//! fields. Intervals are half-open, so a line covers `start..end`. Rather than materializing
//! every covered position, the mask stores sorted, merged intervals and answers membership
//! queries by binary search.

use std::{
    error, fmt,
    fs::File,
    io::{self, BufRead},
    path::Path,
};

use flate2::bufread::MultiGzDecoder;

use nom::{
    bytes::complete::take_till1,
    character::complete::{char, u64 as integer},
    sequence::tuple,
    Finish, IResult,
};

/// The set of genomic positions covered by the region intervals of one chromosome.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Mask {
    intervals: Vec<(u64, u64)>,
}

impl Mask {
    /// Creates a mask from half-open `[start, end)` intervals.
    ///
    /// Intervals may be given in any order and may duplicate or overlap one another; the mask is
    /// their union. Empty intervals are ignored.
    pub fn from_regions<I>(regions: I) -> Self
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        let mut intervals: Vec<_> = regions
            .into_iter()
            .filter(|(start, end)| end > start)
            .collect();
        intervals.sort_unstable();

        let mut merged: Vec<(u64, u64)> = Vec::with_capacity(intervals.len());

        for (start, end) in intervals {
            match merged.last_mut() {
                Some((_, last_end)) if start <= *last_end => *last_end = (*last_end).max(end),
                _ => merged.push((start, end)),
            }
        }

        Self { intervals: merged }
    }

    /// Reads the mask for one chromosome from a BED-style region list.
    ///
    /// Only lines whose first field equals `chromosome` contribute; fields beyond the third are
    /// ignored. A chromosome with no matching lines yields an empty mask.
    ///
    /// # Errors
    ///
    /// A line with fewer than three fields, or with non-numeric bounds, aborts with a parse error
    /// naming the line. No partial mask is returned.
    pub fn read<R>(reader: R, chromosome: &str) -> Result<Self, ReadMaskError>
    where
        R: BufRead,
    {
        let mut regions = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;

            let (chrom, start, end) = parse_region(&line).ok_or_else(|| ReadMaskError::Parse {
                line_number: index + 1,
                line: line.clone(),
            })?;

            if chrom == chromosome {
                regions.push((start, end));
            }
        }

        Ok(Self::from_regions(regions))
    }

    /// Reads the mask for one chromosome from a region-list file.
    ///
    /// The file may be gzip-compressed; compression is detected from the magic number.
    pub fn read_from_path<P>(path: P, chromosome: &str) -> Result<Self, ReadMaskError>
    where
        P: AsRef<Path>,
    {
        let mut reader = File::open(path).map(io::BufReader::new)?;

        if is_gzipped(&mut reader)? {
            Self::read(io::BufReader::new(MultiGzDecoder::new(reader)), chromosome)
        } else {
            Self::read(reader, chromosome)
        }
    }

    /// Returns `true` if `position` is covered by the mask.
    pub fn contains(&self, position: u64) -> bool {
        let index = self
            .intervals
            .partition_point(|&(start, _)| start <= position);

        index > 0 && position < self.intervals[index - 1].1
    }

    /// Returns `true` if the mask covers no positions.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Returns the number of merged intervals in the mask.
    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    /// Returns the number of positions covered by the mask.
    pub fn coverage(&self) -> u64 {
        self.intervals.iter().map(|(start, end)| end - start).sum()
    }
}

fn is_gzipped<R>(reader: &mut R) -> io::Result<bool>
where
    R: BufRead,
{
    const GZIP_MAGIC_NUMBER: [u8; 2] = [0x1f, 0x8b];

    let src = reader.fill_buf()?;

    Ok(src.get(..GZIP_MAGIC_NUMBER.len()) == Some(&GZIP_MAGIC_NUMBER[..]))
}

fn fields(line: &str) -> IResult<&str, (&str, char, u64, char, u64)> {
    tuple((
        take_till1(|c| c == '\t'),
        char('\t'),
        integer,
        char('\t'),
        integer,
    ))(line)
}

/// Parses the three mandatory fields of a region line, ignoring any extras.
fn parse_region(line: &str) -> Option<(&str, u64, u64)> {
    let (rest, (chrom, _, start, _, end)) = fields(line).finish().ok()?;

    (rest.is_empty() || rest.starts_with('\t')).then_some((chrom, start, end))
}

/// An error reading a region list.
#[derive(Debug)]
pub enum ReadMaskError {
    /// An underlying I/O error.
    Io(io::Error),
    /// A line could not be parsed as a region.
    Parse {
        /// 1-based number of the offending line.
        line_number: usize,
        /// The offending line.
        line: String,
    },
}

impl From<io::Error> for ReadMaskError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl fmt::Display for ReadMaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "{e}"),
            Self::Parse { line_number, line } => {
                write!(f, "invalid region on line {line_number}: '{line}'")
            }
        }
    }
}

impl error::Error for ReadMaskError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_open_membership() {
        let mask = Mask::from_regions([(10, 20)]);

        assert!(!mask.contains(9));
        assert!(mask.contains(10));
        assert!(mask.contains(19));
        assert!(!mask.contains(20));
    }

    #[test]
    fn test_union_of_overlapping_regions() {
        let mask = Mask::from_regions([(10, 20), (15, 25), (40, 50), (20, 22)]);

        assert_eq!(mask.interval_count(), 2);
        assert_eq!(mask.coverage(), 25);
        assert!(mask.contains(21));
        assert!(!mask.contains(30));
    }

    #[test]
    fn test_empty_intervals_are_ignored() {
        let mask = Mask::from_regions([(10, 10), (20, 15)]);

        assert!(mask.is_empty());
        assert!(!mask.contains(10));
    }

    #[test]
    fn test_read_filters_by_chromosome() {
        let src = "chr1\t10\t20\nchr2\t5\t8\nchr1\t30\t35\n";

        let mask = Mask::read(src.as_bytes(), "chr1").unwrap();
        assert!(mask.contains(10));
        assert!(mask.contains(30));
        assert!(!mask.contains(5));

        let empty = Mask::read(src.as_bytes(), "chr3").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let src = "chr1\t10\t20\tLINE/L1\t432\t+\n";

        let mask = Mask::read(src.as_bytes(), "chr1").unwrap();

        assert_eq!(mask.coverage(), 10);
    }

    #[test]
    fn test_truncated_line_is_fatal() {
        let src = "chr1\t10\t20\nchr1\t30\n";

        let result = Mask::read(src.as_bytes(), "chr1");

        assert!(matches!(
            result,
            Err(ReadMaskError::Parse { line_number: 2, .. })
        ));
    }

    #[test]
    fn test_non_numeric_bounds_are_fatal() {
        assert!(Mask::read("chr1\tten\t20\n".as_bytes(), "chr1").is_err());
        assert!(Mask::read("chr1\t10\t20x\n".as_bytes(), "chr1").is_err());
    }

    #[test]
    fn test_read_gzipped_source() {
        use std::io::Write as _;

        use flate2::{write::GzEncoder, Compression};

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"chr1\t10\t20\n").unwrap();
        let gz = encoder.finish().unwrap();

        let mut reader = io::BufReader::new(&gz[..]);
        assert!(is_gzipped(&mut reader).unwrap());

        let mask = Mask::read(io::BufReader::new(MultiGzDecoder::new(reader)), "chr1").unwrap();

        assert!(mask.contains(10));
        assert!(!mask.contains(20));
    }
}
