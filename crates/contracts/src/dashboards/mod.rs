pub mod d402_latest_orders;
