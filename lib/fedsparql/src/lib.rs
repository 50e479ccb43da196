#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]

pub mod model {
    pub use fedsparql_model::*;
}

pub mod graph {
    pub use fedsparql_graph::*;
}

pub mod physical {
    pub use fedsparql_physical::*;
}

pub mod update {
    pub use fedsparql_update::*;
}

pub mod common {
    pub use fedsparql_common::*;
}
