// Opens the default camera and converts frames into a buffer suitable for the window.
// Every frame comes out at the requested size and mirrored, so moving your
// hand right moves the cursor right.
// Visual: the frame is a mirror image, like looking into a bathroom mirror.

use crate::error::Error;
use crate::types::{pack_rgb, FrameBuffer};

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

use image::{imageops, RgbImage};

// A small wrapper around nokhwa::Camera so our main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,  // size frames are delivered at (the layout's size)
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` asking for `width` x `height`.
    /// Devices that pick another resolution get resized in `next_frame`.
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::MJPEG, // 720p over USB2 needs compression
            30,                 // target FPS
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        // This fails when no device exists at `index`.
        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        let actual = cam.resolution();
        tracing::info!(
            index,
            device_width = actual.width(),
            device_height = actual.height(),
            width,
            height,
            "camera stream open"
        );

        Ok(Self { cam, width, height })
    }

    /// Grab one frame (blocks until the camera has one), resize it to the
    /// target resolution, mirror it and pack it as 0x00RRGGBB.
    pub fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let rgb_img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        let (w, h) = rgb_img.dimensions();
        let img = RgbImage::from_raw(w, h, rgb_img.into_raw())
            .ok_or_else(|| Error::CameraFrame(format!("Short {w}x{h} frame")))?;

        Ok(mirror_to_framebuffer(img, self.width, self.height))
    }
}

/// Resize (if needed) and mirror an RGB image into a packed frame.
pub fn mirror_to_framebuffer(img: RgbImage, width: u32, height: u32) -> FrameBuffer {
    let mut img = if img.dimensions() == (width, height) {
        img
    } else {
        imageops::resize(&img, width, height, imageops::FilterType::Triangle)
    };
    imageops::flip_horizontal_in_place(&mut img);

    let pixels = img.pixels().map(|p| pack_rgb(p[0], p[1], p[2])).collect();
    FrameBuffer { width: width as usize, height: height as usize, pixels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn frames_are_mirrored() {
        let mut img = RgbImage::new(3, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(2, 0, Rgb([0, 0, 255]));
        let fb = mirror_to_framebuffer(img, 3, 1);
        assert_eq!(fb.pixels, vec![0x0000_00FF, 0, 0x00FF_0000]);
    }

    #[test]
    fn other_resolutions_are_resized() {
        let img = RgbImage::from_pixel(64, 48, Rgb([10, 20, 30]));
        let fb = mirror_to_framebuffer(img, 128, 72);
        assert_eq!((fb.width, fb.height), (128, 72));
        assert_eq!(fb.pixels.len(), 128 * 72);
        assert!(fb.pixels.iter().all(|&p| p == pack_rgb(10, 20, 30)));
    }
}
