#![allow(unused_crate_dependencies)]

mod batch_delete;
mod update_one;
