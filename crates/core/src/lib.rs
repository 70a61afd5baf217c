//! Live face detection: capture, derive, detect, annotate, display.

pub mod annotation {
    pub mod annotation_renderer;
}

pub mod capture {
    pub mod domain {
        pub mod capture_device;
    }
    pub mod infrastructure;
}

pub mod detection {
    pub mod domain {
        pub mod detector_loader;
        pub mod detector_parameters;
        pub mod face_detector;
        pub mod object_detector;
    }
    pub mod infrastructure;
}

pub mod display {
    pub mod domain {
        pub mod display_surface;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod live_config;
    pub mod live_detection_loop;
    pub mod pipeline_logger;
}

pub mod shared {
    pub mod constants;
    pub mod frame;
    pub mod geometry;
    pub mod rect;
}

pub mod transform {
    pub mod color;
    pub mod frame_transform;
}
