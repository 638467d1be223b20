pub mod allele;
pub mod anyvar;
pub mod cli;
pub mod loader;
pub mod vcf;
