use std::sync::Arc;

use service::donors::DonorService;

#[derive(Clone)]
pub struct ServerState {
    pub donors: Arc<DonorService>,
}

impl ServerState {
    pub fn new(donors: DonorService) -> Self {
        Self { donors: Arc::new(donors) }
    }
}
