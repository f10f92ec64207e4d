/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

mod blossom;
mod maximal;

// Re-exports to allow direct access to the algorithms
pub use blossom::{maximum_cardinality_matching, mcm_stage};
pub use maximal::maximal_matching;
