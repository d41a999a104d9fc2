pub mod openfoodfacts;

pub use openfoodfacts::OpenFoodFactsRepository;
