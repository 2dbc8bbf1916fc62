#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use kestrel_lie as lie;

#[doc(inline)]
pub use kestrel_manifold as manifold;

#[doc(inline)]
pub use kestrel_geometry as geometry;
