//! On-screen display for the live detection loop.
//!
//! The iced window owns the main thread; the detection loop runs on a worker
//! thread and talks to the window through a [`WindowDisplay`].

mod app;
pub mod window_display;

use std::thread;

use thiserror::Error;

use app::App;
pub use window_display::WindowDisplay;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("window failed: {0}")]
    Window(#[from] iced::Error),
    #[error("detection thread panicked")]
    WorkerPanicked,
}

/// Opens a window titled `title` and runs `session` on a worker thread with
/// a display bound to it.
///
/// Returns once both have finished. The window closes when the session
/// closes its display; closing the window first is seen by the session as
/// `KeyCode::WindowClosed`.
pub fn run_with_window<T, F>(title: &str, session: F) -> Result<T, ViewerError>
where
    F: FnOnce(WindowDisplay) -> T + Send + 'static,
    T: Send + 'static,
{
    let (display, link) = WindowDisplay::connect();
    let worker = thread::spawn(move || session(display));

    let title = title.to_string();
    let frames = link.frames;
    let keys = link.keys;
    let result = iced::application(
        move || {
            App::new(
                title.clone(),
                window_display::ViewerLink {
                    frames: frames.clone(),
                    keys: keys.clone(),
                },
            )
        },
        App::update,
        App::view,
    )
    .title(App::title)
    .theme(App::theme)
    .subscription(App::subscription)
    .window(iced::window::Settings {
        size: iced::Size::new(640.0, 480.0),
        ..Default::default()
    })
    .run();

    let outcome = worker.join().map_err(|_| ViewerError::WorkerPanicked)?;
    result?;
    Ok(outcome)
}
