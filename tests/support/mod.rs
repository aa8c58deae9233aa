pub mod mock_modes;
