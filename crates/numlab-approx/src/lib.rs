//! numlab approximation: quadrature, Chebyshev best-square approximation,
//! and least-squares polynomial fitting.

pub mod chebyshev;
pub mod fit;
pub mod quadrature;

pub use chebyshev::ChebyshevSeries;
pub use fit::{polyfit, PolyFit};
pub use quadrature::{adaptive_simpson, quad, QuadOptions, QuadResult, SimpsonOptions};
