//! different utility modules used throughout the project
/// reads the equation column of a CSV/TSV table
pub mod equation_loader;
/// logger initialisation and tiny functions to save results into files
pub mod logger;
/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" into HashMap
pub mod task_parser;
/// standalone .tex report of a converted batch
pub mod tex_document;
