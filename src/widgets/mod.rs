pub mod controls;
pub mod datatable;
pub mod debug;
pub mod figure;
pub mod option_list;
pub mod radio_block;
