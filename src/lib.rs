/**
    xenstore-rs provides a Rust based xenstore implementation.
    Copyright (C) 2016 Star Lab Corp.

    This program is free software; you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation; either version 2 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License along
    with this program; if not, see <http://www.gnu.org/licenses/>.
**/

//! Wire protocol core for XenStore.
//!
//! This crate implements the framing, incremental parsing, and typed
//! request/response message algebra of the XenStore wire protocol, without
//! any notion of a store, a transaction manager, or a transport daemon: it
//! is the layer every client and server implementation sits on top of.

pub mod acl;
pub mod correlate;
pub mod error;
pub mod name;
pub mod op;
pub mod packet;
pub mod parser;
pub mod path;
pub mod request;
pub mod response;
pub mod stream;
pub mod token;
pub mod unmarshal;
