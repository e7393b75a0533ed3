//! Common feature correspondence loader.
//!
//! Correspondences come from an external feature tracker, either as a CSV table or as a compact
//! little endian `.pairs` stream.

use anyhow::{anyhow, Result};
use nalgebra as na;
use polarflow::prelude::v1::{to_polar_tracked, PolarSample, StatusFilter};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};

/// Tracked feature positions in two frames.
///
/// All three lists are positionally aligned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Correspondences {
    pub before: Vec<na::Point2<f32>>,
    pub after: Vec<na::Point2<f32>>,
    /// `true` if the tracker reported the feature as followed.
    pub status: Vec<bool>,
}

impl Correspondences {
    pub fn push(&mut self, before: na::Point2<f32>, after: na::Point2<f32>, tracked: bool) {
        self.before.push(before);
        self.after.push(after);
        self.status.push(tracked);
    }

    pub fn len(&self) -> usize {
        self.before.len()
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty()
    }

    /// Convert to polar samples.
    ///
    /// # Arguments
    ///
    /// * `filter` - how to treat correspondences that were not tracked.
    pub fn to_polar(&self, filter: StatusFilter) -> polarflow::error::Result<Vec<PolarSample>> {
        to_polar_tracked(&self.before, &self.after, &self.status, filter)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
struct CsvRow {
    before_x: f32,
    before_y: f32,
    after_x: f32,
    after_y: f32,
    /// Missing status means tracked.
    #[serde(default)]
    status: Option<u8>,
}

/// Read correspondences from a CSV table.
///
/// The table has `before_x,before_y,after_x,after_y` columns, and an optional `status` column,
/// where `0` marks a lost feature.
pub fn read_csv(reader: impl Read) -> Result<Correspondences> {
    let mut out = Correspondences::default();

    for row in csv::Reader::from_reader(reader).deserialize() {
        let row: CsvRow = row?;
        out.push(
            na::Point2::new(row.before_x, row.before_y),
            na::Point2::new(row.after_x, row.after_y),
            row.status.map(|s| s != 0).unwrap_or(true),
        );
    }

    Ok(out)
}

/// Write correspondences as a CSV table.
pub fn write_csv(writer: impl Write, pairs: &Correspondences) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    for ((b, a), &tracked) in pairs.before.iter().zip(&pairs.after).zip(&pairs.status) {
        writer.serialize(CsvRow {
            before_x: b.x,
            before_y: b.y,
            after_x: a.x,
            after_y: a.y,
            status: Some(tracked as u8),
        })?;
    }

    writer.flush()?;

    Ok(())
}

/// Read correspondences from a `.pairs` stream.
///
/// The stream starts with a 32-bit LE count, followed by that many entries of 4 LE f32 values
/// (`before.x, before.y, after.x, after.y`) and a status byte.
pub fn read_pairs(mut reader: impl Read) -> Result<Correspondences> {
    let mut cnt = [0u8; std::mem::size_of::<u32>()];
    reader.read_exact(&mut cnt)?;

    let mut out = Correspondences::default();

    for _ in 0..u32::from_le_bytes(cnt) {
        let mut data = [[0u8; std::mem::size_of::<f32>()]; 4];
        for b in &mut data {
            reader.read_exact(&mut *b)?;
        }
        let mut status = [0u8];
        reader.read_exact(&mut status)?;

        out.push(
            na::Point2::new(f32::from_le_bytes(data[0]), f32::from_le_bytes(data[1])),
            na::Point2::new(f32::from_le_bytes(data[2]), f32::from_le_bytes(data[3])),
            status[0] != 0,
        );
    }

    Ok(out)
}

/// Write correspondences as a `.pairs` stream.
pub fn write_pairs(mut writer: impl Write, pairs: &Correspondences) -> Result<()> {
    let cnt = u32::try_from(pairs.len()).map_err(|_| anyhow!("Too many correspondences"))?;
    writer.write_all(&cnt.to_le_bytes())?;

    for ((b, a), &tracked) in pairs.before.iter().zip(&pairs.after).zip(&pairs.status) {
        for v in [b.x, b.y, a.x, a.y] {
            writer.write_all(&v.to_le_bytes())?;
        }
        writer.write_all(&[tracked as u8])?;
    }

    Ok(())
}

/// Open a file or an input stream.
///
/// `tcp://host:port` connects to a remote tracker, and `tcp://@:port` waits for one to connect.
pub fn open_input(input: &str) -> Result<Box<dyn Read + Send>> {
    if let Some(input) = input.strip_prefix("tcp://") {
        let (addr, port) = input
            .split_once(':')
            .ok_or_else(|| anyhow!("Invalid format"))?;
        let port: u16 = str::parse(port)?;

        let stream = if addr == "@" {
            let listener = TcpListener::bind(("0.0.0.0", port))?;
            let (sock, addr) = listener.accept()?;
            log::info!("Accept {}", addr);
            sock
        } else {
            log::info!("Connecting to {}", input);
            TcpStream::connect(input)?
        };

        Ok(Box::new(stream))
    } else {
        std::fs::File::open(input)
            .map(|i| Box::new(i) as _)
            .map_err(Into::into)
    }
}

/// Load correspondences depending on the input.
///
/// If the input ends with `.pairs`, it will be interpreted as a binary pair stream. `-` reads a
/// CSV table from standard input, and anything else is read as a CSV table.
pub fn load(input: &str) -> Result<Correspondences> {
    let pairs = if input == "-" {
        read_csv(std::io::stdin().lock())?
    } else if input.ends_with(".pairs") {
        read_pairs(BufReader::new(open_input(input)?))?
    } else {
        read_csv(BufReader::new(open_input(input)?))?
    };

    log::debug!("loaded {} correspondences from {}", pairs.len(), input);

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pairs() -> Correspondences {
        let mut pairs = Correspondences::default();
        pairs.push(na::Point2::new(1.0, 2.0), na::Point2::new(4.0, 6.0), true);
        pairs.push(na::Point2::new(-3.5, 0.0), na::Point2::new(-3.5, 0.25), false);
        pairs
    }

    #[test]
    fn csv_without_status() {
        let data = "before_x,before_y,after_x,after_y\n1,2,4,6\n0,0,0,-1\n";
        let pairs = read_csv(data.as_bytes()).unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs.status, vec![true, true]);
        assert_eq!(pairs.after[1], na::Point2::new(0.0, -1.0));

        let samples = pairs.to_polar(StatusFilter::AcceptAll).unwrap();
        assert_eq!(samples[0].magnitude, 5.0);
        assert!((samples[1].angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(samples[1].magnitude, 1.0);
    }

    #[test]
    fn csv_with_status() {
        let data = "before_x,before_y,after_x,after_y,status\n1,2,4,6,1\n0,0,0,-1,0\n5,5,5,5,\n";
        let pairs = read_csv(data.as_bytes()).unwrap();

        assert_eq!(pairs.status, vec![true, false, true]);
        assert_eq!(pairs.to_polar(StatusFilter::TrackedOnly).unwrap().len(), 2);
        assert_eq!(pairs.to_polar(StatusFilter::AcceptAll).unwrap().len(), 3);
    }

    #[test]
    fn csv_bad_row() {
        let data = "before_x,before_y,after_x,after_y\n1,2,four,6\n";
        assert!(read_csv(data.as_bytes()).is_err());
    }

    #[test]
    fn csv_written_back() {
        let mut buf = vec![];
        write_csv(&mut buf, &sample_pairs()).unwrap();
        assert_eq!(read_csv(buf.as_slice()).unwrap(), sample_pairs());
    }

    #[test]
    fn pairs_stream() {
        let mut buf = vec![];
        write_pairs(&mut buf, &sample_pairs()).unwrap();

        assert_eq!(buf.len(), 4 + 2 * 17);
        assert_eq!(&buf[..4], &2u32.to_le_bytes());
        assert_eq!(read_pairs(buf.as_slice()).unwrap(), sample_pairs());
    }

    #[test]
    fn truncated_pairs_stream() {
        let mut buf = vec![];
        write_pairs(&mut buf, &sample_pairs()).unwrap();
        buf.pop();

        assert!(read_pairs(buf.as_slice()).is_err());
        assert!(read_pairs(&[1u8, 0][..]).is_err());
    }

    #[test]
    fn load_by_extension() {
        let dir = std::env::temp_dir().join(format!("pair-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let binary = dir.join("frames.pairs");
        write_pairs(std::fs::File::create(&binary).unwrap(), &sample_pairs()).unwrap();

        // Anything that is not a `.pairs` stream is a CSV table.
        let table = dir.join("frames.txt");
        write_csv(std::fs::File::create(&table).unwrap(), &sample_pairs()).unwrap();

        assert_eq!(load(binary.to_str().unwrap()).unwrap(), sample_pairs());
        assert_eq!(load(table.to_str().unwrap()).unwrap(), sample_pairs());

        // A CSV table behind a `.pairs` name is rejected by the binary reader.
        std::fs::copy(&table, &binary).unwrap();
        assert!(load(binary.to_str().unwrap()).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file() {
        assert!(load("/nonexistent/pairs.csv").is_err());
        assert!(open_input("tcp://nowhere").is_err());
    }
}
