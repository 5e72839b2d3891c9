//! # Activation Functions Module
//!
//! Non-linearities applied after the fully connected layers of the value
//! network. Hidden layers default to ReLU; the regression output layer is
//! always [`Activation::Linear`].
//!
//! ```rust
//! use deepq::activations::Activation;
//! use ndarray::array;
//!
//! let mut batch = array![[1.0, -0.5, 0.0, 2.0]];
//! Activation::Relu.apply_batch(&mut batch);
//! assert_eq!(batch, array![[1.0, 0.0, 0.0, 2.0]]);
//! ```

pub mod functions;

pub use functions::Activation;
