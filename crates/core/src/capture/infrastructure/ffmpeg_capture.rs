use crate::capture::domain::capture_device::{CaptureDevice, CaptureSource, StreamInfo};
use crate::shared::frame::{ColorSpace, Frame};

/// Captures frames via ffmpeg-next (libavdevice + libavcodec).
///
/// Each decoded picture is converted to BGR24 and wrapped in a [`Frame`].
pub struct FfmpegCapture {
    source: CaptureSource,
    session: Option<Session>,
}

struct Session {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    stream_index: usize,
    width: u32,
    height: u32,
    frame_index: usize,
    flushing: bool,
}

// Safety: FfmpegCapture is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegCapture {}

impl FfmpegCapture {
    pub fn new(source: CaptureSource) -> Self {
        Self {
            source,
            session: None,
        }
    }

    fn open_input(&self) -> Result<ffmpeg_next::format::context::Input, Box<dyn std::error::Error>> {
        match &self.source {
            CaptureSource::File(path) => Ok(ffmpeg_next::format::input(path)?),
            CaptureSource::Device { input_format, name } => {
                ffmpeg_next::device::register_all();
                let format = ffmpeg_next::device::input::video()
                    .find(|f| f.name() == input_format.as_str())
                    .ok_or_else(|| format!("input device format {input_format} is not available"))?;
                let ctx =
                    ffmpeg_next::format::open_with(name, &format, ffmpeg_next::Dictionary::new())?;
                Ok(ctx.input())
            }
        }
    }
}

impl CaptureDevice for FfmpegCapture {
    fn source_name(&self) -> String {
        self.source.to_string()
    }

    fn open(&mut self) -> Result<StreamInfo, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let ictx = self.open_input()?;
        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;

        let stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let rate = stream.rate();
        let fps = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };

        let width = decoder.width();
        let height = decoder.height();
        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::BGR24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        let info = StreamInfo {
            width,
            height,
            fps,
            description: self.source.to_string(),
        };

        self.session = Some(Session {
            ictx,
            decoder,
            scaler,
            stream_index,
            width,
            height,
            frame_index: 0,
            flushing: false,
        });

        Ok(info)
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let session = self.session.as_mut().ok_or("FfmpegCapture: not opened")?;

        loop {
            if let Some(frame) = session.try_receive()? {
                return Ok(Some(frame));
            }
            if session.flushing {
                return Ok(None);
            }

            match session.ictx.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() != session.stream_index {
                        continue;
                    }
                    if let Err(e) = session.decoder.send_packet(&packet) {
                        log::warn!("Dropping undecodable packet: {e}");
                    }
                }
                None => {
                    if let Err(e) = session.decoder.send_eof() {
                        log::warn!("Failed to flush decoder: {e}");
                    }
                    session.flushing = true;
                }
            }
        }
    }

    fn release(&mut self) {
        self.session = None;
    }
}

impl Session {
    fn try_receive(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return Ok(None);
        }

        let mut bgr_frame = ffmpeg_next::util::frame::video::Video::empty();
        self.scaler.run(&decoded, &mut bgr_frame)?;

        let pixels = extract_packed_pixels(&bgr_frame, self.width, self.height);
        let frame = Frame::new(
            pixels,
            self.width,
            self.height,
            ColorSpace::Bgr,
            self.frame_index,
        )?;
        self.frame_index += 1;
        Ok(Some(frame))
    }
}

/// Copies a packed 3-byte-per-pixel ffmpeg frame into a contiguous buffer,
/// dropping the row padding ffmpeg may add after each line.
fn extract_packed_pixels(
    frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = frame.stride(0);
    let data = frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    /// Encodes a short MPEG-4 clip of solid-colored frames.
    fn create_test_video(path: &Path, num_frames: usize, width: u32, height: u32) {
        ffmpeg_next::init().unwrap();

        let mut octx = ffmpeg_next::format::output(path).unwrap();
        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4).unwrap();
        let mut ost = octx.add_stream(Some(codec)).unwrap();
        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()
            .unwrap();
        encoder_ctx.set_width(width);
        encoder_ctx.set_height(height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
        encoder_ctx.set_time_base(ffmpeg_next::Rational(1, 10));
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(10, 1)));
        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }
        let mut encoder = encoder_ctx
            .open_with(ffmpeg_next::Dictionary::new())
            .unwrap();
        ost.set_parameters(&encoder);
        let ost_index = ost.index();
        octx.write_header().unwrap();
        let ost_time_base = octx.stream(ost_index).unwrap().time_base();

        let mut scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::BGR24,
            width,
            height,
            ffmpeg_next::format::Pixel::YUV420P,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .unwrap();

        let write_packets = |encoder: &mut ffmpeg_next::encoder::Video,
                                 octx: &mut ffmpeg_next::format::context::Output| {
            let mut encoded = ffmpeg_next::Packet::empty();
            while encoder.receive_packet(&mut encoded).is_ok() {
                encoded.set_stream(ost_index);
                encoded.rescale_ts(ffmpeg_next::Rational(1, 10), ost_time_base);
                encoded.write_interleaved(octx).unwrap();
            }
        };

        for i in 0..num_frames {
            let mut bgr = ffmpeg_next::util::frame::video::Video::new(
                ffmpeg_next::format::Pixel::BGR24,
                width,
                height,
            );
            let stride = bgr.stride(0);
            let shade = (i * 40 % 256) as u8;
            for row in 0..height as usize {
                for col in 0..width as usize {
                    let at = row * stride + col * 3;
                    bgr.data_mut(0)[at..at + 3].copy_from_slice(&[shade, 128, 255 - shade]);
                }
            }
            let mut yuv = ffmpeg_next::util::frame::video::Video::empty();
            scaler.run(&bgr, &mut yuv).unwrap();
            yuv.set_pts(Some(i as i64));
            encoder.send_frame(&yuv).unwrap();
            write_packets(&mut encoder, &mut octx);
        }
        encoder.send_eof().unwrap();
        write_packets(&mut encoder, &mut octx);
        octx.write_trailer().unwrap();
    }

    #[test]
    fn test_reads_every_frame_of_a_file_then_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        create_test_video(&path, 5, 64, 48);

        let mut capture = FfmpegCapture::new(CaptureSource::File(path));
        let info = capture.open().unwrap();
        assert_eq!((info.width, info.height), (64, 48));

        let mut indices = Vec::new();
        while let Some(frame) = capture.read_frame().unwrap() {
            assert_eq!(frame.color_space(), ColorSpace::Bgr);
            assert_eq!((frame.width(), frame.height()), (64, 48));
            indices.push(frame.index());
        }
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert!(capture.read_frame().unwrap().is_none());
    }

    #[test]
    fn test_read_before_open_fails() {
        let mut capture = FfmpegCapture::new(CaptureSource::File(PathBuf::from("unused.mp4")));
        assert!(capture.read_frame().is_err());
    }

    #[test]
    fn test_open_missing_file_fails() {
        let mut capture =
            FfmpegCapture::new(CaptureSource::File(PathBuf::from("/nonexistent/clip.mp4")));
        assert!(capture.open().is_err());
    }

    #[test]
    fn test_unknown_device_format_fails() {
        let mut capture = FfmpegCapture::new(CaptureSource::Device {
            input_format: "no-such-format".into(),
            name: "0".into(),
        });
        assert!(capture.open().is_err());
    }

    #[test]
    fn test_release_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        create_test_video(&path, 2, 32, 32);

        let mut capture = FfmpegCapture::new(CaptureSource::File(path));
        capture.open().unwrap();
        capture.release();
        capture.release();
        assert!(capture.read_frame().is_err());
    }
}
