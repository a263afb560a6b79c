mod packs;
mod upload;
