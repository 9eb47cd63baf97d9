pub mod image_xobject;
pub mod writer;
