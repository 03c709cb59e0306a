//! Audio file decoding to interleaved stereo.
//!
//! WAV files go through hound; everything else through symphonia's probe.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, errors::Error as SymphoniaError,
    formats::FormatOptions, io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};
use tracing::{debug, trace};

use super::{to_stereo, AudioBuffer};
use crate::error::{Result, VisualizerError};

/// Decode an audio file into an interleaved stereo buffer
pub fn decode_file(path: &Path) -> Result<AudioBuffer> {
    let is_wav = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

    let buffer = if is_wav {
        decode_wav(path)?
    } else {
        decode_symphonia(path)?
    };

    if buffer.frames() == 0 {
        return Err(VisualizerError::Decode(format!(
            "{} produced no samples",
            path.display()
        )));
    }

    debug!(
        "Decoded {}: {} frames @ {} Hz ({:.1}s)",
        path.display(),
        buffer.frames(),
        buffer.sample_rate,
        buffer.duration_secs()
    );
    Ok(buffer)
}

fn decode_wav(path: &Path) -> Result<AudioBuffer> {
    let mut reader = hound::WavReader::open(path).map_err(|e| match e {
        hound::Error::IoError(io) => VisualizerError::Io(io),
        other => VisualizerError::Decode(format!("{}: {}", path.display(), other)),
    })?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>(),
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1_i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()
        }
    }
    .map_err(|e| VisualizerError::Decode(format!("{}: {}", path.display(), e)))?;

    Ok(AudioBuffer::new(
        to_stereo(&samples, spec.channels as usize),
        spec.sample_rate,
    ))
}

fn decode_symphonia(path: &Path) -> Result<AudioBuffer> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(ext);
    }

    let decode_err = |what: &str, e: SymphoniaError| {
        VisualizerError::Decode(format!("{} ({}): {}", what, path.display(), e))
    };

    let probed = get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| decode_err("Failed to probe audio file", e))?;
    let mut format = probed.format;

    let track = format.default_track().ok_or_else(|| {
        VisualizerError::Decode(format!("{} contains no default track", path.display()))
    })?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;

    let mut decoder = get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decode_err("Failed to create decoder", e))?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err)) if err.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(decode_err("Failed to read audio packet", err)),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(audio_buffer) => {
                let spec = *audio_buffer.spec();
                sample_rate.get_or_insert(spec.rate);

                let mut sample_buffer =
                    SampleBuffer::<f32>::new(audio_buffer.capacity() as u64, spec);
                sample_buffer.copy_interleaved_ref(audio_buffer);
                samples.extend(to_stereo(sample_buffer.samples(), spec.channels.count()));
            }
            // Corrupt packets are skipped, the rest of the stream may still decode
            Err(SymphoniaError::DecodeError(err)) => {
                trace!("Skipping undecodable packet: {}", err);
            }
            Err(err) => return Err(decode_err("Failed to decode audio packet", err)),
        }
    }

    let sample_rate = sample_rate.ok_or_else(|| {
        VisualizerError::Decode(format!("{} is missing a sample rate", path.display()))
    })?;
    Ok(AudioBuffer::new(samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, channels: u16, frames: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in frames {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_decode_mono_wav_to_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, 1, &[0, 16384, -16384, 32767]);

        let buffer = decode_file(&path).unwrap();
        assert_eq!(buffer.sample_rate, 22050);
        assert_eq!(buffer.frames(), 4);
        assert_eq!(buffer.frame(1), (0.5, 0.5));
        assert_eq!(buffer.frame(2), (-0.5, -0.5));
    }

    #[test]
    fn test_decode_stereo_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.WAV");
        write_wav(&path, 2, &[16384, -16384, 0, 0]);

        let buffer = decode_file(&path).unwrap();
        assert_eq!(buffer.frames(), 2);
        assert_eq!(buffer.frame(0), (0.5, -0.5));
    }

    #[test]
    fn test_empty_wav_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_wav(&path, 1, &[]);

        assert!(matches!(
            decode_file(&path),
            Err(VisualizerError::Decode(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = decode_file(Path::new("/definitely/not/here.mp3"));
        assert!(matches!(result, Err(VisualizerError::Io(_))));
    }

    #[test]
    fn test_garbage_file_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.mp3");
        std::fs::write(&path, b"this is not audio").unwrap();

        assert!(decode_file(&path).is_err());
    }
}
