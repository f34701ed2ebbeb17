//! Built-in stage implementations and the selector-string registry the pipeline
//! assembler uses to turn `PipelineConfig` selectors into concrete stages.

pub mod biome;
pub mod composition;
pub mod finish;
pub mod height;
pub mod structure;

use crate::biome::Biome;
use crate::block;
use crate::error::GeneratorError;
use crate::stage::{BiomeGen, FinishGen, StructureGen, TerrainCompositionGen, TerrainHeightGen};

/// Split a selector into its name and `:`-separated arguments, both case-insensitively
/// on the name (arguments keep their original case since block/biome names are matched
/// case-insensitively too, but numeric arguments obviously don't care).
fn split_selector(selector: &str) -> (String, Vec<&str>) {
    let mut parts = selector.split(':');
    let name = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
    let args: Vec<&str> = parts.map(str::trim).collect();
    (name, args)
}

fn parse_biome(name: &str) -> Option<Biome> {
    Some(match name.to_ascii_lowercase().as_str() {
        "void" => Biome::Void,
        "ocean" => Biome::Ocean,
        "plains" => Biome::Plains,
        "desert" => Biome::Desert,
        "forest" => Biome::Forest,
        "taiga" => Biome::Taiga,
        "swampland" => Biome::Swampland,
        "tundra" => Biome::Tundra,
        "icedesert" => Biome::IceDesert,
        "savanna" => Biome::Savanna,
        "rainforest" => Biome::RainForest,
        "seasonalforest" => Biome::SeasonalForest,
        "shrubland" => Biome::ShrubLand,
        _ => return None,
    })
}

fn parse_ore(name: &str) -> Option<u8> {
    Some(match name.to_ascii_lowercase().as_str() {
        "coal_ore" => block::COAL_ORE,
        "iron_ore" => block::IRON_ORE,
        "gold_ore" => block::GOLD_ORE,
        "diamond_ore" => block::DIAMOND_ORE,
        "clay" => block::CLAY,
        "gravel" => block::GRAVEL,
        _ => return None,
    })
}

fn arg<T: std::str::FromStr>(args: &[&str], index: usize, default: T) -> Result<T, GeneratorError> {
    match args.get(index) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| {
            GeneratorError::InvalidConfig(format!("argument {index} ({raw:?}) is not valid"))
        }),
    }
}

pub fn build_biome_gen(selector: &str, seed: i64) -> Result<Box<dyn BiomeGen>, GeneratorError> {
    let (name, args) = split_selector(selector);
    match name.as_str() {
        "constant" => {
            let biome_name = args.first().copied().unwrap_or("plains");
            let biome = parse_biome(biome_name)
                .ok_or_else(|| GeneratorError::InvalidConfig(format!("unknown biome {biome_name:?}")))?;
            Ok(Box::new(biome::ConstantBiomeGen::new(biome)))
        }
        "climate" => Ok(Box::new(biome::ClimateBiomeGen::new(seed))),
        _ => Err(GeneratorError::InvalidConfig(format!("unknown biome_gen selector {selector:?}"))),
    }
}

pub fn build_height_gen(selector: &str, seed: i64) -> Result<Box<dyn TerrainHeightGen>, GeneratorError> {
    let (name, args) = split_selector(selector);
    match name.as_str() {
        "flat" => {
            let height: i16 = arg(&args, 0, 64)?;
            Ok(Box::new(height::FlatHeightGen::new(height)))
        }
        "climate" => Ok(Box::new(height::ClimateHeightGen::new(seed))),
        _ => Err(GeneratorError::InvalidConfig(format!("unknown height_gen selector {selector:?}"))),
    }
}

pub fn build_composition_gen(selector: &str, _seed: i64) -> Result<Box<dyn TerrainCompositionGen>, GeneratorError> {
    let (name, _args) = split_selector(selector);
    match name.as_str() {
        "classic" => Ok(Box::new(composition::ClassicCompositionGen)),
        "layered" => Ok(Box::new(composition::LayeredCompositionGen::new())),
        _ => Err(GeneratorError::InvalidConfig(format!("unknown composition_gen selector {selector:?}"))),
    }
}

pub fn build_structure_gen(selector: &str, seed: i64, salt: i64) -> Result<Box<dyn StructureGen>, GeneratorError> {
    let (name, args) = split_selector(selector);
    match name.as_str() {
        "vein" => {
            let ore_name = args.first().copied()
                .ok_or_else(|| GeneratorError::InvalidConfig("vein: missing ore name".into()))?;
            let place_id = parse_ore(ore_name)
                .ok_or_else(|| GeneratorError::InvalidConfig(format!("unknown ore {ore_name:?}")))?;
            let count: u8 = arg(&args, 1, 8)?;
            let tries: u32 = arg(&args, 2, 8)?;
            let min_y: i32 = arg(&args, 3, 0)?;
            let max_y: i32 = arg(&args, 4, 64)?;
            Ok(Box::new(structure::VeinStructureGen::new(seed, salt, block::STONE, place_id, count, tries, min_y, max_y)))
        }
        _ => Err(GeneratorError::InvalidConfig(format!("unknown structure selector {selector:?}"))),
    }
}

pub fn build_finish_gen(selector: &str, seed: i64) -> Result<Box<dyn FinishGen>, GeneratorError> {
    let (name, args) = split_selector(selector);
    match name.as_str() {
        "decorate" => {
            let tree_tries: u32 = arg(&args, 0, 4)?;
            let grass_tries: u32 = arg(&args, 1, 8)?;
            Ok(Box::new(finish::DecorateFinishGen::new(seed, tree_tries, grass_tries)))
        }
        _ => Err(GeneratorError::InvalidConfig(format!("unknown finisher selector {selector:?}"))),
    }
}
