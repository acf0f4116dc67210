//! Names of the environment variables injected into a build step.

/// SonarQube server URL.
pub const SONAR_HOST_URL: &str = "SONAR_HOST_URL";
/// Name of the installation in use.
pub const SONAR_CONFIG_NAME: &str = "SONAR_CONFIG_NAME";
/// Analysis login.
pub const SONAR_LOGIN: &str = "SONAR_LOGIN";
/// Analysis password.
pub const SONAR_PASSWORD: &str = "SONAR_PASSWORD";
/// JDBC URL of the SonarQube database.
pub const SONAR_JDBC_URL: &str = "SONAR_JDBC_URL";
/// JDBC username.
pub const SONAR_JDBC_USERNAME: &str = "SONAR_JDBC_USERNAME";
/// JDBC password.
pub const SONAR_JDBC_PASSWORD: &str = "SONAR_JDBC_PASSWORD";
/// Maven goal that runs the analysis.
pub const SONAR_MAVEN_GOAL: &str = "SONAR_MAVEN_GOAL";
/// `-D` properties and extra arguments for the analysis.
pub const SONAR_EXTRA_PROPS: &str = "SONAR_EXTRA_PROPS";

/// Every injected name, in display order.
pub const ALL: [&str; 9] = [
    SONAR_HOST_URL,
    SONAR_CONFIG_NAME,
    SONAR_LOGIN,
    SONAR_PASSWORD,
    SONAR_JDBC_URL,
    SONAR_JDBC_USERNAME,
    SONAR_JDBC_PASSWORD,
    SONAR_MAVEN_GOAL,
    SONAR_EXTRA_PROPS,
];

/// Injected names whose values are secret.
pub const SECRET: [&str; 2] = [SONAR_PASSWORD, SONAR_JDBC_PASSWORD];
