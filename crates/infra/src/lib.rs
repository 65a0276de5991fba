//! Infrastructure layer: external price sources, the spot price cache and the
//! catalog file.

pub mod catalog;
pub mod spot_price;
