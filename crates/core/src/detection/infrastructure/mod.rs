pub mod cascade_loader;
pub mod haar_cascade;
pub mod rectangle_grouping;
