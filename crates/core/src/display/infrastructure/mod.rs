pub mod headless_display;
