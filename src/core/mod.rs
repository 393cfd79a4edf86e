pub mod action;
pub mod dispatcher;
pub mod locks;
pub mod machine;
pub mod reply;
pub mod startup;
