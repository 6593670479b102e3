use kube::ResourceExt;
use nfdeployment::NFDeployment;

pub fn has_finalizer(nfdeployment: &NFDeployment, finalizer: &str) -> bool {
    nfdeployment.finalizers().iter().any(|f| f == finalizer)
}

// Adds the finalizer unless present. Returns true if the object was modified.
pub fn add_finalizer(nfdeployment: &mut NFDeployment, finalizer: &str) -> bool {
    if has_finalizer(nfdeployment, finalizer) {
        return false;
    }
    nfdeployment.finalizers_mut().push(finalizer.to_string());
    true
}

// Removes every occurrence of the finalizer. Returns true if the object was modified.
pub fn remove_finalizer(nfdeployment: &mut NFDeployment, finalizer: &str) -> bool {
    let finalizers = nfdeployment.finalizers_mut();
    let before = finalizers.len();
    finalizers.retain(|f| f != finalizer);
    finalizers.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfdeployment::NFDeploymentSpec;

    const FINALIZER: &str = "nfdeployment.nephio.org/finalizer";

    #[test]
    fn add_is_idempotent() {
        let mut nfd = NFDeployment::new("upf1", NFDeploymentSpec::default());
        assert!(add_finalizer(&mut nfd, FINALIZER));
        assert!(!add_finalizer(&mut nfd, FINALIZER));
        assert_eq!(nfd.finalizers(), &[FINALIZER.to_string()]);
    }

    #[test]
    fn remove_leaves_other_finalizers() {
        let mut nfd = NFDeployment::new("upf1", NFDeploymentSpec::default());
        nfd.metadata.finalizers = Some(vec![
            "example.com/other".to_string(),
            FINALIZER.to_string(),
        ]);

        assert!(remove_finalizer(&mut nfd, FINALIZER));
        assert!(!remove_finalizer(&mut nfd, FINALIZER));
        assert!(!has_finalizer(&nfd, FINALIZER));
        assert_eq!(nfd.finalizers(), &["example.com/other".to_string()]);
    }
}
