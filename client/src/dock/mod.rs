mod engine;
mod episode;

#[cfg(test)]
mod tests;

pub(crate) use engine::DockEngine;
pub(crate) use episode::EpisodeRegistry;
