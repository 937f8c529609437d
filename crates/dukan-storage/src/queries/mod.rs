// SPDX-FileCopyrightText: 2026 Dukan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on storage entities.

pub mod addresses;
pub mod coupons;
pub mod items;
pub mod orders;
pub mod reviews;
pub mod shops;
