pub mod mca;
