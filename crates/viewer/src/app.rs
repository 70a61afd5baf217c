use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use iced::keyboard::key::Named;
use iced::keyboard::{self, Key};
use iced::widget::{container, image, text};
use iced::{event, window, ContentFit, Element, Event, Length, Subscription, Task, Theme};

use facewatch_core::display::domain::display_surface::KeyCode;

use crate::window_display::{FramePixels, ViewerLink};

/// How often the window checks for a new frame.
const FRAME_POLL_INTERVAL: Duration = Duration::from_millis(10);

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    PollFrame,
    KeyPressed(KeyCode),
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    title: String,
    frames: Receiver<FramePixels>,
    keys: Sender<KeyCode>,
    current: Option<image::Handle>,
    shown: usize,
}

impl App {
    pub fn new(title: String, link: ViewerLink) -> (Self, Task<Message>) {
        (
            Self {
                title,
                frames: link.frames,
                keys: link.keys,
                current: None,
                shown: 0,
            },
            Task::none(),
        )
    }

    pub fn title(&self) -> String {
        self.title.clone()
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PollFrame => {
                let mut latest = None;
                loop {
                    match self.frames.try_recv() {
                        Ok(pixels) => latest = Some(pixels),
                        Err(TryRecvError::Empty) => break,
                        Err(TryRecvError::Disconnected) => {
                            log::debug!("Detection loop finished after {} frames", self.shown);
                            return iced::exit();
                        }
                    }
                }
                if let Some(pixels) = latest {
                    self.current = Some(image::Handle::from_rgba(
                        pixels.width,
                        pixels.height,
                        pixels.rgba,
                    ));
                    self.shown += 1;
                }
            }
            Message::KeyPressed(key) => {
                if self.keys.send(key).is_err() {
                    return iced::exit();
                }
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match &self.current {
            Some(handle) => image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => text("Waiting for camera...").size(16).into(),
        };
        container(content).center(Length::Fill).into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            iced::time::every(FRAME_POLL_INTERVAL).map(|_| Message::PollFrame),
            event::listen_with(key_event),
        ])
    }
}

fn key_event(event: Event, _status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed { key, .. }) => {
            key_code(&key).map(Message::KeyPressed)
        }
        _ => None,
    }
}

fn key_code(key: &Key) -> Option<KeyCode> {
    match key.as_ref() {
        Key::Character(c) => c.chars().next().map(KeyCode::Char),
        Key::Named(Named::Escape) => Some(KeyCode::Escape),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window_display::WindowDisplay;
    use facewatch_core::display::domain::display_surface::DisplaySurface;
    use facewatch_core::shared::frame::{ColorSpace, Frame};
    use rstest::rstest;

    fn app() -> (App, WindowDisplay) {
        let (display, link) = WindowDisplay::connect();
        let (app, _) = App::new("Video Frame".into(), link);
        (app, display)
    }

    #[rstest]
    #[case::letter(Key::Character("q".into()), Some(KeyCode::Char('q')))]
    #[case::escape(Key::Named(Named::Escape), Some(KeyCode::Escape))]
    #[case::other_named(Key::Named(Named::Enter), None)]
    fn test_key_code(#[case] key: Key, #[case] expected: Option<KeyCode>) {
        assert_eq!(key_code(&key), expected);
    }

    #[test]
    fn test_poll_frame_takes_delivered_frame() {
        let (mut app, mut display) = app();
        assert!(app.current.is_none());

        display
            .show("Video Frame", &Frame::filled(4, 3, ColorSpace::Bgr, 9))
            .unwrap();
        let _ = app.update(Message::PollFrame);

        assert!(app.current.is_some());
        assert_eq!(app.shown, 1);
    }

    #[test]
    fn test_empty_poll_keeps_last_frame() {
        let (mut app, mut display) = app();
        display
            .show("Video Frame", &Frame::filled(4, 3, ColorSpace::Gray, 9))
            .unwrap();
        let _ = app.update(Message::PollFrame);
        let _ = app.update(Message::PollFrame);

        assert!(app.current.is_some());
        assert_eq!(app.shown, 1);
    }

    #[test]
    fn test_key_press_reaches_display() {
        let (mut app, mut display) = app();
        let _ = app.update(Message::KeyPressed(KeyCode::Char('x')));

        assert_eq!(
            display.poll_key(Duration::from_millis(1)),
            Some(KeyCode::Char('x'))
        );
    }

    #[test]
    fn test_title_is_window_name() {
        let (app, _display) = app();
        assert_eq!(app.title(), "Video Frame");
    }
}
