// Cambridge/Aachen sequential recombination with active jet areas
//
// Every event is clustered into a flat history arena: leaves for the input
// particles and ghosts, then one node per recombination referencing its two
// children by index. Final jets are copied out of the arena sorted by pt, so
// they outlive the sequence; the pruner walks the arena while it is alive.
//
// Nearest neighbours are only searched for in the 3x3 block of (eta, phi)
// tiles around a node, which keeps the ghost grid affordable.
//
// Ghosts carry 1e-100 GeV of pt on a jittered (eta, phi) grid. Their only
// effect is the count that ends up in each jet, which gives the jet area.

mod area;
mod definition;
mod sequence;
mod tiling;

pub use area::{GhostAreaSpec, GHOST_PT, MAX_GHOSTS};
pub use definition::{Jet, JetDefinition};
pub use sequence::{ClusterNode, ClusterSequence, NodeKind};
