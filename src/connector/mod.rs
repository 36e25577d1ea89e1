//! View connections.
//!
//! A [`StateConnector`] turns action creators and state filters into the
//! two mapping functions a view binding needs: state-to-props and
//! dispatch-to-props.

mod connector;
mod props;

pub use connector::StateConnector;
pub use props::{ActionProps, Connection, MapDispatchToProps, MapStateToProps, Props};
