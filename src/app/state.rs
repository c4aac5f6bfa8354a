use std::error::Error;
use std::path::PathBuf;

use raylib::prelude::*;

use gloam_session::Session;

/// Windowed application state: the session plus the GPU-side resources the
/// renderer needs (map texture, streamed fog texture, pixel scratch).
pub struct App {
    pub session: Session,
    pub(crate) map_tex: Texture2D,
    pub(crate) fog_tex: Texture2D,
    pub(crate) fog_pixels: Vec<u8>,
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) walls_path: PathBuf,
    pub(crate) last_mouse: Vector2,
}

impl App {
    pub fn new(
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        map_image: &Image,
        session: Session,
        walls_path: PathBuf,
    ) -> Result<Self, Box<dyn Error>> {
        let (w, h) = (map_image.width(), map_image.height());
        let map_tex = rl.load_texture_from_image(thread, map_image)?;
        // Blank RGBA canvas, streamed from the fog bitmask every play frame.
        let blank = Image::gen_image_color(w, h, Color::BLANK);
        let fog_tex = rl.load_texture_from_image(thread, &blank)?;
        Ok(Self {
            session,
            map_tex,
            fog_tex,
            fog_pixels: vec![0; w as usize * h as usize * 4],
            width: w,
            height: h,
            walls_path,
            last_mouse: Vector2::new(-1.0, -1.0),
        })
    }
}
