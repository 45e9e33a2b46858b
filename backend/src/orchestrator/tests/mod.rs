mod test_horizon_drain;
