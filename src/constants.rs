// Server configuration
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_DATA_PATH: &str = "data";
pub const DEFAULT_LOG_FILTER: &str = "expense_tracker_server=debug,tower_http=info";

// Snapshot storage
pub const SNAPSHOT_FILE_NAME: &str = "users.json";

// Session configuration
pub const SESSION_NAME: &str = "axum_session";
pub const SESSION_EXPIRY_DAYS: i64 = 3;
pub const MIN_SESSION_SECRET_LENGTH: usize = 64;
pub const SESSION_USER_ID_KEY: &str = "user_id";
pub const SESSION_USERNAME_KEY: &str = "username";

// Error messages
pub const ERR_ALL_FIELDS_REQUIRED: &str = "All fields are required";
pub const ERR_LOGIN_FIELDS_REQUIRED: &str = "Email and password are required";
pub const ERR_USER_EXISTS: &str = "User already exists";
pub const ERR_INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const ERR_USER_NOT_FOUND: &str = "User not found";
pub const ERR_UNAUTHORIZED: &str = "Not logged in";
pub const ERR_INTERNAL: &str = "Internal server error";

// Success messages
pub const MSG_USER_CREATED: &str = "User created successfully";
pub const MSG_LOGIN_SUCCESS: &str = "Login successful";
pub const MSG_SALARY_UPDATED: &str = "Salary updated successfully";
pub const MSG_EXPENSE_ADDED: &str = "Expense added successfully";
pub const MSG_EXPENSE_DELETED: &str = "Expense deleted successfully";
pub const MSG_API_WORKING: &str = "API is working";
