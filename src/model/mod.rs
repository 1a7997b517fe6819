// Topic modeling: the swap-ready model interface and a variational LDA.

pub mod lda;
pub mod math;
pub mod traits;
