mod bounded;
mod failable_numeric;
mod insideable;
mod persistable;
mod traceable;

pub use bounded::Bounded;
pub use failable_numeric::FallibleNumeric;
pub use insideable::Insideable;
pub use persistable::Persistable;
pub use traceable::Traceable;
